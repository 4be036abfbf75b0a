//! Jump Interpolator
//!
//! A board step is animated as a hop: the moving planar axis advances
//! linearly, height follows a downward parabola through both tile
//! anchors, and the other planar axis is held. A jump in flight cannot be
//! interrupted; the session only accepts the next move once `advance`
//! reports a landing.

use glam::Vec3;
use serde::Serialize;

use crate::config::JumpClock;
use crate::core::coord::{BoardDelta, TileCoord};

/// Allowance for accumulated float error when converting elapsed time to steps.
const STEP_EPSILON: f32 = 1e-4;

// =============================================================================
// PARABOLA
// =============================================================================

/// `z(s) = a·s² + b·s + c`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Parabola {
    /// Leading coefficient
    pub a: f32,
    /// Linear coefficient
    pub b: f32,
    /// Constant term
    pub c: f32,
}

impl Parabola {
    /// Parabola with leading coefficient `-curvature` passing through
    /// `(s0, z0)` and `(s1, z1)`.
    ///
    /// A zero-length span has no arc; the result is the flat line `z0`.
    pub fn through(s0: f32, z0: f32, s1: f32, z1: f32, curvature: f32) -> Self {
        let span = s1 - s0;
        if span.abs() <= f32::EPSILON {
            return Self { a: 0.0, b: 0.0, c: z0 };
        }
        let a = -curvature;
        let b = (z1 - z0) / span - a * (s1 + s0);
        let c = z0 - a * s0 * s0 - b * s0;
        Self { a, b, c }
    }

    /// Height at `s`.
    #[inline]
    pub fn height(&self, s: f32) -> f32 {
        (self.a * s + self.b) * s + self.c
    }
}

// =============================================================================
// JUMP STATE MACHINE
// =============================================================================

/// Planar axis a jump travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum JumpAxis {
    /// Along world X
    X,
    /// Along world Y
    Y,
}

impl JumpAxis {
    /// Axis a board step travels along. Horizontal wins a diagonal.
    pub fn of(delta: BoardDelta) -> Self {
        if delta.x != 0 {
            JumpAxis::X
        } else {
            JumpAxis::Y
        }
    }

    #[inline]
    fn read(self, v: Vec3) -> f32 {
        match self {
            JumpAxis::X => v.x,
            JumpAxis::Y => v.y,
        }
    }

    #[inline]
    fn write(self, v: &mut Vec3, value: f32) {
        match self {
            JumpAxis::X => v.x = value,
            JumpAxis::Y => v.y = value,
        }
    }
}

/// A hop in flight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Jump {
    /// Takeoff anchor
    pub origin: Vec3,
    /// Landing anchor
    pub target: Vec3,
    /// Landing tile
    pub target_tile: TileCoord,
    /// Board step being animated
    pub delta: BoardDelta,
    /// Moving axis
    pub axis: JumpAxis,
    /// Height curve over the moving axis
    pub parabola: Parabola,
    /// Steps completed
    pub step: u32,
    /// Steps in the whole arc
    pub steps: u32,
}

impl Jump {
    /// Position after `step` steps.
    ///
    /// Step 0 is the origin and the final step is the target, both
    /// returned exactly.
    pub fn position_at(&self, step: u32) -> Vec3 {
        if step == 0 {
            return self.origin;
        }
        if step >= self.steps {
            return self.target;
        }
        let t = step as f32 / self.steps as f32;
        let s0 = self.axis.read(self.origin);
        let s1 = self.axis.read(self.target);
        let s = s0 + (s1 - s0) * t;

        let mut position = self.origin;
        self.axis.write(&mut position, s);
        position.z = self.parabola.height(s);
        position
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position_at(self.step)
    }
}

/// Interpolator phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum JumpPhase {
    /// Ready for the next move
    #[default]
    Idle,
    /// A hop is in flight
    Jumping,
}

/// What one `advance` produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JumpProgress {
    /// Nothing in flight
    Idle,
    /// Still airborne
    InFlight {
        /// Visual position this update
        position: Vec3,
    },
    /// Touched down this update
    Landed {
        /// Exact landing anchor
        position: Vec3,
        /// Landing tile
        tile: TileCoord,
    },
}

/// Jump state for one moving entity.
#[derive(Clone, Debug, Default)]
pub struct JumpState {
    current: Option<Jump>,
    accumulator: f32,
}

impl JumpState {
    /// Idle interpolator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> JumpPhase {
        if self.current.is_some() {
            JumpPhase::Jumping
        } else {
            JumpPhase::Idle
        }
    }

    /// True while a hop is in flight.
    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.current.is_some()
    }

    /// Hop in flight, if any.
    pub fn current(&self) -> Option<&Jump> {
        self.current.as_ref()
    }

    /// Start a hop from `origin` to the anchor of `target_tile`.
    ///
    /// Replaces nothing: callers only begin from `Idle`.
    pub fn begin(
        &mut self,
        origin: Vec3,
        target: Vec3,
        target_tile: TileCoord,
        delta: BoardDelta,
        steps: u32,
        curvature: f32,
    ) {
        debug_assert!(self.current.is_none(), "jump begun while airborne");
        let axis = JumpAxis::of(delta);
        let parabola = Parabola::through(
            axis.read(origin),
            origin.z,
            axis.read(target),
            target.z,
            curvature,
        );
        self.current = Some(Jump {
            origin,
            target,
            target_tile,
            delta,
            axis,
            parabola,
            step: 0,
            steps: steps.max(1),
        });
        self.accumulator = 0.0;
    }

    /// Advance the hop for one update.
    ///
    /// `PerUpdate` moves one step per call. `Elapsed` moves one step per
    /// `step_seconds` of accumulated time, so a slow frame may cover
    /// several steps.
    pub fn advance(&mut self, elapsed: f32, clock: JumpClock) -> JumpProgress {
        let Some(jump) = self.current.as_mut() else {
            return JumpProgress::Idle;
        };

        let due = match clock {
            JumpClock::PerUpdate => 1,
            JumpClock::Elapsed { step_seconds } => {
                self.accumulator += elapsed.max(0.0);
                let due = (self.accumulator / step_seconds + STEP_EPSILON).floor();
                self.accumulator = (self.accumulator - due * step_seconds).max(0.0);
                due as u32
            }
        };

        jump.step = jump.step.saturating_add(due).min(jump.steps);
        if jump.step < jump.steps {
            return JumpProgress::InFlight {
                position: jump.position(),
            };
        }

        let landed = JumpProgress::Landed {
            position: jump.target,
            tile: jump.target_tile,
        };
        self.current = None;
        self.accumulator = 0.0;
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ORIGIN: Vec3 = Vec3::new(0.0, 0.0, 0.15);
    const TARGET: Vec3 = Vec3::new(2.0, 0.0, 0.15);

    fn begin_right(state: &mut JumpState) {
        let tile = TileCoord::new(4, 3).unwrap();
        state.begin(ORIGIN, TARGET, tile, BoardDelta::RIGHT, 10, 2.0);
    }

    #[test]
    fn test_parabola_hits_both_endpoints() {
        let p = Parabola::through(-1.0, 0.5, 3.0, -0.25, 2.0);
        assert!((p.height(-1.0) - 0.5).abs() < 1e-5);
        assert!((p.height(3.0) + 0.25).abs() < 1e-5);
        assert_eq!(p.a, -2.0);
    }

    #[test]
    fn test_degenerate_span_is_flat() {
        let p = Parabola::through(1.0, 0.3, 1.0, 0.9, 2.0);
        assert_eq!(p.height(1.0), 0.3);
        assert_eq!(p.height(5.0), 0.3);
    }

    #[test]
    fn test_per_update_lands_after_steps() {
        let mut state = JumpState::new();
        begin_right(&mut state);
        assert_eq!(state.phase(), JumpPhase::Jumping);
        assert_eq!(state.current().unwrap().position(), ORIGIN);

        for _ in 0..9 {
            match state.advance(0.0, JumpClock::PerUpdate) {
                JumpProgress::InFlight { position } => assert!(position.z > ORIGIN.z),
                other => panic!("expected in flight, got {:?}", other),
            }
        }
        match state.advance(0.0, JumpClock::PerUpdate) {
            JumpProgress::Landed { position, tile } => {
                assert_eq!(position, TARGET);
                assert_eq!(tile, TileCoord::new(4, 3).unwrap());
            }
            other => panic!("expected landing, got {:?}", other),
        }
        assert_eq!(state.phase(), JumpPhase::Idle);
        assert_eq!(state.advance(0.0, JumpClock::PerUpdate), JumpProgress::Idle);
    }

    #[test]
    fn test_cross_axis_held() {
        let origin = Vec3::new(1.0, -2.0, 0.0);
        let target = Vec3::new(1.0, 0.0, 0.5);
        let mut state = JumpState::new();
        state.begin(origin, target, TileCoord::CENTER, BoardDelta::UP, 10, 2.0);
        let jump = state.current().unwrap();
        for step in 1..10 {
            let p = jump.position_at(step);
            assert_eq!(p.x, 1.0);
            assert!(p.y > -2.0 && p.y < 0.0);
        }
        assert_eq!(jump.position_at(10), target);
    }

    #[test]
    fn test_elapsed_clock_is_frame_rate_independent() {
        let clock = JumpClock::Elapsed { step_seconds: 0.01 };

        let mut fast = JumpState::new();
        begin_right(&mut fast);
        let mut fast_updates = 0;
        while fast.is_jumping() {
            fast.advance(0.01, clock);
            fast_updates += 1;
        }

        let mut slow = JumpState::new();
        begin_right(&mut slow);
        let mut slow_updates = 0;
        while slow.is_jumping() {
            slow.advance(0.05, clock);
            slow_updates += 1;
        }

        assert_eq!(fast_updates, 10);
        assert_eq!(slow_updates, 2);
    }

    #[test]
    fn test_elapsed_clock_accumulates_short_frames() {
        let clock = JumpClock::Elapsed { step_seconds: 0.02 };
        let mut state = JumpState::new();
        begin_right(&mut state);
        state.advance(0.01, clock);
        assert_eq!(state.current().unwrap().step, 0);
        state.advance(0.01, clock);
        assert_eq!(state.current().unwrap().step, 1);
    }

    #[test]
    fn test_large_frame_lands_exactly() {
        let mut state = JumpState::new();
        begin_right(&mut state);
        let progress = state.advance(10.0, JumpClock::Elapsed { step_seconds: 1.0 / 60.0 });
        assert_eq!(
            progress,
            JumpProgress::Landed {
                position: TARGET,
                tile: TileCoord::new(4, 3).unwrap()
            }
        );
    }

    proptest! {
        #[test]
        fn prop_endpoints_exact(
            ox in -6.0f32..6.0, oz in -1.0f32..1.0,
            dz in -1.0f32..1.0, steps in 1u32..30, curvature in 0.0f32..5.0,
        ) {
            let origin = Vec3::new(ox, 1.0, oz);
            let target = Vec3::new(ox + 2.0, 1.0, oz + dz);
            let mut state = JumpState::new();
            state.begin(origin, target, TileCoord::CENTER, BoardDelta::RIGHT, steps, curvature);
            let jump = state.current().unwrap();
            prop_assert_eq!(jump.position_at(0), origin);
            prop_assert_eq!(jump.position_at(steps), target);
            for step in 0..=steps {
                prop_assert_eq!(jump.position_at(step).y, 1.0);
            }
        }
    }
}
