//! Collaborator Interfaces
//!
//! The scene graph and the sound mixer live outside the game core. The
//! session is handed already-resolved implementations of these traits at
//! construction and drives them through handles; it never loads assets
//! or decodes device events itself.
//!
//! - `camera`: orbit camera fields and frame math
//! - `headless`: in-memory scene and recording mixer for tools and tests

pub mod camera;
pub mod headless;

use glam::{Affine3A, Quat, Vec3};
use serde::Serialize;

pub use camera::OrbitCamera;
pub use headless::{HeadlessScene, RecordingSound};

/// Opaque reference to a transform owned by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TransformHandle(pub u32);

/// Opaque reference to a playing sound owned by the mixer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SoundHandle(pub u32);

/// Scene/transform service.
pub trait SceneGraph {
    /// Look up a transform by exact name.
    fn find_transform(&self, name: &str) -> Option<TransformHandle>;

    /// Every transform whose name starts with `prefix`.
    fn transforms_with_prefix(&self, prefix: &str) -> Vec<TransformHandle>;

    /// Current local position of a transform.
    fn position(&self, handle: TransformHandle) -> Vec3;

    /// Move a transform.
    fn set_position(&mut self, handle: TransformHandle, position: Vec3);

    /// Rotate a transform.
    fn set_rotation(&mut self, handle: TransformHandle, rotation: Quat);

    /// Number of cameras in the scene.
    fn camera_count(&self) -> usize;

    /// Write the orbit camera's local-to-parent frame back to the scene camera.
    fn set_camera_frame(&mut self, frame: Affine3A);
}

/// Positional sound service.
pub trait SoundSystem {
    /// Start a looping positional sample.
    fn loop_3d(&mut self, sample: &str, volume: f32, position: Vec3, falloff: f32) -> SoundHandle;

    /// Move a playing sound.
    fn set_position(&mut self, sound: SoundHandle, position: Vec3);

    /// Change a playing sound's volume.
    fn set_volume(&mut self, sound: SoundHandle, volume: f32);

    /// Place the listener.
    fn set_listener(&mut self, position: Vec3, right: Vec3);
}
