//! # Zombie Hunt
//!
//! Gameplay core of a tile-based hunt: a player hops across a 7×7 board,
//! an independent cursor scans tiles, and committing on the cursor
//! classifies the occupant as a zombie (point gained) or a human (point
//! lost) until every zombie is found.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ZOMBIE HUNT                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Board primitives                         │
//! │  ├── coord.rs     - Clamped tile coordinates                 │
//! │  ├── direction.rs - Camera-relative remap, facings           │
//! │  ├── rng.rs       - Xorshift128+ PRNG for seeding            │
//! │  └── hash.rs      - State hashing for replay checks          │
//! │                                                              │
//! │  game/            - Session logic                            │
//! │  ├── board.rs     - Tile arena                               │
//! │  ├── entity.rs    - Player and hunted rosters                │
//! │  ├── setup.rs     - Scene binding                            │
//! │  ├── seeder.rs    - Random placement                         │
//! │  ├── jump.rs      - Parabolic hop interpolation              │
//! │  ├── selection.rs - Commit resolution and scoring            │
//! │  ├── sound.rs     - Ambient loop positioning                 │
//! │  ├── input.rs     - Button edge counters                     │
//! │  ├── state.rs     - Session lifecycle                        │
//! │  └── tick.rs      - Per-frame update and replay              │
//! │                                                              │
//! │  scene/           - Collaborator interfaces                  │
//! │  ├── camera.rs    - Orbit camera                             │
//! │  └── headless.rs  - In-memory scene and mixer                │
//! │                                                              │
//! │  config.rs        - JSON session configuration               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collaborators
//!
//! Rendering, asset loading, audio playback and device input live outside
//! this crate. A session is handed a [`scene::SceneGraph`] and a
//! [`scene::SoundSystem`] at construction and only talks to them through
//! handles.
//!
//! ## Reproducibility
//!
//! Board placement draws from a seeded Xorshift128+. With a fixed
//! `rng_seed` and the elapsed-time fed to `update`, a recorded input
//! script replays to the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod scene;

// Re-export commonly used types
pub use config::{GameConfig, JumpClock};
pub use crate::core::coord::{TileCoord, BOARD_WIDTH};
pub use crate::core::rng::DeterministicRng;
pub use game::input::{ButtonId, InputEvent, InputScript};
pub use game::state::GameSession;
pub use game::tick::UpdateResult;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the demo drives updates at (Hz)
pub const FRAME_RATE: u32 = 60;
