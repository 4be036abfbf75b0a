//! Headless collaborators.
//!
//! An in-memory transform list standing in for the loaded scene, and a
//! mixer that records what it was asked to play. Used by the demo binary
//! and by tests.

use glam::{Affine3A, Quat, Vec3};

use super::{SceneGraph, SoundHandle, SoundSystem, TransformHandle};
use crate::config::GameConfig;
use crate::core::coord::{BOARD_WIDTH, OFFSET};

/// One named transform.
#[derive(Clone, Debug)]
pub struct HeadlessTransform {
    /// Scene name
    pub name: String,
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
}

/// In-memory scene graph.
#[derive(Clone, Debug, Default)]
pub struct HeadlessScene {
    transforms: Vec<HeadlessTransform>,
    cameras: usize,
    camera_frame: Option<Affine3A>,
}

impl HeadlessScene {
    /// Empty scene with no cameras.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene holding everything a session built from `config` expects:
    /// one camera, the player, both rosters and a full board of tiles.
    pub fn standard(config: &GameConfig) -> Self {
        let mut scene = Self::new();
        scene.add_camera();
        scene.add_transform(&config.player_name, Vec3::ZERO);
        // Hunted entities wait below the board until they are found.
        let hidden = Vec3::new(0.0, 0.0, -10.0);
        for name in config.zombie_names.iter().take(config.zombie_count) {
            scene.add_transform(name, hidden);
        }
        for name in config.human_names.iter().take(config.human_count) {
            scene.add_transform(name, hidden);
        }
        let mut index = 0;
        for y in 0..BOARD_WIDTH {
            for x in 0..BOARD_WIDTH {
                let anchor = Vec3::new(
                    (x - OFFSET) as f32 * config.tile_size,
                    (y - OFFSET) as f32 * config.tile_size,
                    0.0,
                );
                scene.add_transform(&format!("{}.{:03}", config.tile_prefix, index), anchor);
                index += 1;
            }
        }
        scene
    }

    /// Add a named transform.
    pub fn add_transform(&mut self, name: &str, position: Vec3) -> TransformHandle {
        self.transforms.push(HeadlessTransform {
            name: name.to_string(),
            position,
            rotation: Quat::IDENTITY,
        });
        TransformHandle((self.transforms.len() - 1) as u32)
    }

    /// Remove a transform by name, for exercising setup failures.
    pub fn remove_transform(&mut self, name: &str) {
        // Handles are indices, so keep the slot and just hide the name.
        for t in self.transforms.iter_mut().filter(|t| t.name == name) {
            t.name.clear();
        }
    }

    /// Add a camera.
    pub fn add_camera(&mut self) {
        self.cameras += 1;
    }

    /// Look at a transform.
    pub fn transform(&self, handle: TransformHandle) -> &HeadlessTransform {
        &self.transforms[handle.0 as usize]
    }

    /// Last camera frame written by the session.
    pub fn camera_frame(&self) -> Option<Affine3A> {
        self.camera_frame
    }
}

impl SceneGraph for HeadlessScene {
    fn find_transform(&self, name: &str) -> Option<TransformHandle> {
        self.transforms
            .iter()
            .position(|t| !t.name.is_empty() && t.name == name)
            .map(|i| TransformHandle(i as u32))
    }

    fn transforms_with_prefix(&self, prefix: &str) -> Vec<TransformHandle> {
        self.transforms
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.name.is_empty() && t.name.starts_with(prefix))
            .map(|(i, _)| TransformHandle(i as u32))
            .collect()
    }

    fn position(&self, handle: TransformHandle) -> Vec3 {
        self.transforms[handle.0 as usize].position
    }

    fn set_position(&mut self, handle: TransformHandle, position: Vec3) {
        self.transforms[handle.0 as usize].position = position;
    }

    fn set_rotation(&mut self, handle: TransformHandle, rotation: Quat) {
        self.transforms[handle.0 as usize].rotation = rotation;
    }

    fn camera_count(&self) -> usize {
        self.cameras
    }

    fn set_camera_frame(&mut self, frame: Affine3A) {
        self.camera_frame = Some(frame);
    }
}

/// One looping sound started through [`RecordingSound`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedLoop {
    /// Sample name
    pub sample: String,
    /// Current volume
    pub volume: f32,
    /// Current position
    pub position: Vec3,
    /// Falloff given at start
    pub falloff: f32,
}

/// Mixer that records loops and listener placement.
#[derive(Clone, Debug, Default)]
pub struct RecordingSound {
    loops: Vec<RecordedLoop>,
    listener: Option<(Vec3, Vec3)>,
}

impl RecordingSound {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every loop started so far, indexed by handle.
    pub fn loops(&self) -> &[RecordedLoop] {
        &self.loops
    }

    /// A single loop.
    pub fn get(&self, sound: SoundHandle) -> Option<&RecordedLoop> {
        self.loops.get(sound.0 as usize)
    }

    /// Listener position and right vector, once set.
    pub fn listener(&self) -> Option<(Vec3, Vec3)> {
        self.listener
    }
}

impl SoundSystem for RecordingSound {
    fn loop_3d(&mut self, sample: &str, volume: f32, position: Vec3, falloff: f32) -> SoundHandle {
        self.loops.push(RecordedLoop {
            sample: sample.to_string(),
            volume,
            position,
            falloff,
        });
        SoundHandle((self.loops.len() - 1) as u32)
    }

    fn set_position(&mut self, sound: SoundHandle, position: Vec3) {
        if let Some(l) = self.loops.get_mut(sound.0 as usize) {
            l.position = position;
        }
    }

    fn set_volume(&mut self, sound: SoundHandle, volume: f32) {
        if let Some(l) = self.loops.get_mut(sound.0 as usize) {
            l.volume = volume;
        }
    }

    fn set_listener(&mut self, position: Vec3, right: Vec3) {
        self.listener = Some((position, right));
    }
}
