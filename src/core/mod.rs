//! Core board primitives.
//!
//! Coordinates, direction mapping, seeding randomness and state hashing.
//! Nothing here touches the scene or sound collaborators.

pub mod coord;
pub mod direction;
pub mod rng;
pub mod hash;

// Re-export core types
pub use coord::{BoardDelta, TileCoord, BOARD_WIDTH, OFFSET, TILE_COUNT, clamp_axis};
pub use direction::{remap, facing_toward, CameraQuadrant, Facing};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
