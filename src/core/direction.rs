//! Camera-Relative Direction Mapping
//!
//! Raw movement intent arrives in camera-local screen axes. The camera
//! orbits the board, so the intent is rotated into board axes in 90°
//! steps chosen by the camera azimuth: "forward" always points away from
//! the camera. The same mapping drives the player and the active-tile
//! cursor.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Quat;
use serde::Serialize;

use super::coord::{BoardDelta, TileCoord};

const THREE_FRAC_PI_4: f32 = 3.0 * FRAC_PI_4;

/// Wrap an angle into `[-π, π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    if (-PI..PI).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can land exactly on TAU for tiny negative inputs
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Which quarter of the orbit the camera is viewing from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CameraQuadrant {
    /// `[-π/4, π/4)`: identity
    Front,
    /// `[π/4, 3π/4)`: `(x, y) → (-y, x)`
    Left,
    /// `[-3π/4, -π/4)`: `(x, y) → (y, -x)`
    Right,
    /// Everything else: `(x, y) → (-x, -y)`
    Back,
}

impl CameraQuadrant {
    /// Classify an azimuth. Intervals are half-open, so the boundary
    /// angles belong to the quadrant above them.
    pub fn from_azimuth(azimuth: f32) -> Self {
        let a = wrap_angle(azimuth);
        if (-FRAC_PI_4..FRAC_PI_4).contains(&a) {
            CameraQuadrant::Front
        } else if (FRAC_PI_4..THREE_FRAC_PI_4).contains(&a) {
            CameraQuadrant::Left
        } else if (-THREE_FRAC_PI_4..-FRAC_PI_4).contains(&a) {
            CameraQuadrant::Right
        } else {
            CameraQuadrant::Back
        }
    }

    /// Rotate a camera-local delta into board axes.
    #[inline]
    pub fn apply(self, delta: BoardDelta) -> BoardDelta {
        let BoardDelta { x, y } = delta;
        match self {
            CameraQuadrant::Front => BoardDelta::new(x, y),
            CameraQuadrant::Left => BoardDelta::new(-y, x),
            CameraQuadrant::Right => BoardDelta::new(y, -x),
            CameraQuadrant::Back => BoardDelta::new(-x, -y),
        }
    }
}

/// Remap a raw camera-local delta into a board delta for the given azimuth.
#[inline]
pub fn remap(raw: BoardDelta, camera_azimuth: f32) -> BoardDelta {
    CameraQuadrant::from_azimuth(camera_azimuth).apply(raw)
}

/// Cardinal facing of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Facing {
    /// +Y
    #[default]
    Up,
    /// -Y
    Down,
    /// -X
    Left,
    /// +X
    Right,
}

impl Facing {
    /// Yaw about +Z in radians, measured from +X.
    pub fn angle(self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::Up => FRAC_PI_2,
            Facing::Left => PI,
            Facing::Down => -FRAC_PI_2,
        }
    }

    /// Rotation that turns a model into this facing.
    pub fn rotation(self) -> Quat {
        Quat::from_rotation_z(self.angle())
    }

    /// Snap an arbitrary yaw to the nearest cardinal facing.
    pub fn from_angle(angle: f32) -> Self {
        let a = wrap_angle(angle);
        if (-FRAC_PI_4..FRAC_PI_4).contains(&a) {
            Facing::Right
        } else if (FRAC_PI_4..THREE_FRAC_PI_4).contains(&a) {
            Facing::Up
        } else if (-THREE_FRAC_PI_4..-FRAC_PI_4).contains(&a) {
            Facing::Down
        } else {
            Facing::Left
        }
    }

    /// Facing of a board step, `None` for a zero step.
    pub fn from_delta(delta: BoardDelta) -> Option<Self> {
        if delta.is_zero() {
            None
        } else if delta.x.abs() >= delta.y.abs() {
            Some(if delta.x > 0 { Facing::Right } else { Facing::Left })
        } else {
            Some(if delta.y > 0 { Facing::Up } else { Facing::Down })
        }
    }
}

/// Facing that turns an entity standing on `from` toward `to`.
///
/// Returns `None` when both coordinates are the same tile.
pub fn facing_toward(from: TileCoord, to: TileCoord) -> Option<Facing> {
    let BoardDelta { x: dx, y: dy } = from.delta_to(to);
    if dx == 0 {
        // dy / dx is singular here
        return match dy.signum() {
            1 => Some(Facing::Up),
            -1 => Some(Facing::Down),
            _ => None,
        };
    }
    let mut angle = (dy as f32 / dx as f32).atan();
    if dx < 0 {
        angle += PI;
    }
    Some(Facing::from_angle(angle))
}
