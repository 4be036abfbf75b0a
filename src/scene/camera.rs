//! Orbit camera.
//!
//! Trackball-style orbit around a target: azimuth about +Z, elevation
//! measured up from the board plane, and a dolly radius.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Affine3A, Quat, Vec2, Vec3};
use serde::Serialize;

/// Radians of orbit per normalized window unit of mouse motion.
const ORBIT_GAIN: f32 = 3.0;

const MIN_RADIUS: f32 = 1e-1;
const MAX_RADIUS: f32 = 1e6;

/// Camera state read by the direction mapper and updated by raw input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitCamera {
    /// Orbit angle about +Z, kept in `[-π, π]`
    pub azimuth: f32,
    /// Angle above the board plane, kept in `[-π, π]`
    pub elevation: f32,
    /// Distance from the target
    pub radius: f32,
    /// Point the camera looks at
    pub target: Vec3,
    /// Reverse azimuth drag when the orbit started upside-down
    pub flip_x: bool,
}

impl OrbitCamera {
    /// Create a camera looking at `target` from azimuth 0.
    pub fn new(target: Vec3, radius: f32, elevation: f32) -> Self {
        Self {
            azimuth: 0.0,
            elevation,
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            target,
            flip_x: false,
        }
    }

    /// Start a drag. An upside-down camera drags azimuth the other way.
    pub fn begin_orbit(&mut self) {
        self.flip_x = self.elevation.abs() > FRAC_PI_2;
    }

    /// Orbit by a normalized window-space drag.
    pub fn orbit(&mut self, delta: Vec2) {
        let sign = if self.flip_x { -1.0 } else { 1.0 };
        self.azimuth = wrap_turn(self.azimuth - ORBIT_GAIN * delta.x * sign);
        self.elevation = wrap_turn(self.elevation - ORBIT_GAIN * delta.y);
    }

    /// Dolly in (positive wheel) or out.
    pub fn dolly(&mut self, wheel: f32) {
        self.radius = (self.radius * 0.5f32.powf(0.1 * wheel)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Camera orientation.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.azimuth) * Quat::from_rotation_x(FRAC_PI_2 - self.elevation)
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.target + self.radius * (self.rotation() * Vec3::Z)
    }

    /// Camera right vector in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Local-to-parent frame of the camera transform.
    pub fn local_to_parent(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation(), self.position())
    }
}

/// Normalize raw mouse motion into the `[-a, a] x [-1, 1]` window frame.
pub fn normalized_motion(xrel: f32, yrel: f32, window_width: u32, window_height: u32) -> Vec2 {
    let w = window_width.max(1) as f32;
    let h = window_height.max(1) as f32;
    Vec2::new(xrel / w * 2.0 * (h / w), yrel / h * -2.0)
}

/// Wrap to the nearest turn, landing in `[-π, π]`.
fn wrap_turn(angle: f32) -> f32 {
    let turns = angle / TAU;
    (turns - turns.round()) * TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_orbit_wraps_azimuth() {
        let mut cam = OrbitCamera::new(Vec3::ZERO, 10.0, 0.5);
        for _ in 0..100 {
            cam.orbit(Vec2::new(0.37, 0.0));
            assert!(cam.azimuth >= -PI - 1e-4 && cam.azimuth <= PI + 1e-4);
        }
    }

    #[test]
    fn test_flip_reverses_drag() {
        let mut upright = OrbitCamera::new(Vec3::ZERO, 10.0, 0.5);
        upright.begin_orbit();
        upright.orbit(Vec2::new(0.1, 0.0));

        let mut flipped = OrbitCamera::new(Vec3::ZERO, 10.0, 2.0);
        flipped.begin_orbit();
        assert!(flipped.flip_x);
        flipped.orbit(Vec2::new(0.1, 0.0));

        assert!((upright.azimuth + flipped.azimuth).abs() < 1e-6);
    }

    #[test]
    fn test_dolly_clamps_radius() {
        let mut cam = OrbitCamera::new(Vec3::ZERO, 10.0, 0.5);
        cam.dolly(1000.0);
        assert_eq!(cam.radius, MIN_RADIUS);
        cam.dolly(-10_000.0);
        assert_eq!(cam.radius, MAX_RADIUS);
    }

    #[test]
    fn test_default_view_looks_down_from_minus_y() {
        // Azimuth 0, zero elevation: camera sits behind the board on -Y.
        let cam = OrbitCamera::new(Vec3::ZERO, 10.0, 0.0);
        let pos = cam.position();
        assert!((pos - Vec3::new(0.0, -10.0, 0.0)).length() < 1e-4);
        assert!((cam.right() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_normalized_motion() {
        let d = normalized_motion(100.0, 50.0, 800, 600);
        assert!((d.x - 100.0 / 800.0 * 2.0 * 0.75).abs() < 1e-6);
        assert!((d.y + 50.0 / 600.0 * 2.0).abs() < 1e-6);
    }
}
