//! Game Logic Module
//!
//! Board state, entity bookkeeping and the per-frame session update.
//!
//! ## Module Structure
//!
//! - `board`: Tile arena and occupancy
//! - `entity`: Player and hunted rosters
//! - `setup`: Binding named scene references
//! - `seeder`: Random non-colliding placement
//! - `jump`: Parabolic hop between tiles
//! - `selection`: Commit resolution and scoring
//! - `sound`: Ambient loop placement and volume
//! - `input`: Button edge counters and input scripts
//! - `events`: Per-update event log
//! - `state`: The session and its lifecycle
//! - `tick`: Per-frame update and replay

pub mod board;
pub mod entity;
pub mod setup;
pub mod seeder;
pub mod jump;
pub mod selection;
pub mod sound;
pub mod input;
pub mod events;
pub mod state;
pub mod tick;

// Re-export key types
pub use board::{Board, Occupant, Tile};
pub use entity::{Entity, EntityId, EntityKind, HuntedKind, Registry};
pub use events::{GameEvent, GameEventData};
pub use input::{Button, ButtonId, InputEvent, InputScript, InputState};
pub use jump::{JumpPhase, JumpState};
pub use selection::{SelectionOutcome, Tally};
pub use setup::SetupError;
pub use state::GameSession;
pub use tick::{replay_session, UpdateResult};
