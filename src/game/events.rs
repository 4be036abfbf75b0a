//! Game Events
//!
//! What happened during one update, in the order it happened. Events are
//! informational: the session state is authoritative, events only let a
//! front end or a replay log observe it.

use serde::Serialize;

use crate::core::coord::{BoardDelta, TileCoord};
use crate::core::direction::Facing;
use crate::game::entity::{EntityId, HuntedKind};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEventData {
    /// Player took off toward a new tile
    PlayerMoved {
        from: TileCoord,
        to: TileCoord,
        delta: BoardDelta,
        facing: Facing,
    },

    /// Player move stopped by the board edge
    MoveBlocked {
        at: TileCoord,
        delta: BoardDelta,
    },

    /// Player touched down
    JumpLanded {
        tile: TileCoord,
    },

    /// Active tile moved (or was held at the edge)
    CursorMoved {
        from: TileCoord,
        to: TileCoord,
        clamped: bool,
    },

    /// Commit on an unresolved zombie
    ZombieFound {
        entity: EntityId,
        tile: TileCoord,
        revealed: bool,
        score: i32,
    },

    /// Commit on an unresolved human
    HumanFound {
        entity: EntityId,
        tile: TileCoord,
        revealed: bool,
        score: i32,
    },

    /// Commit on a tile with no occupant
    EmptyTileCommitted {
        tile: TileCoord,
        score: i32,
    },

    /// Commit on a tile that was already counted
    AlreadyResolved {
        tile: TileCoord,
    },

    /// Last zombie found
    GameOver {
        score: i32,
        updates: u32,
    },
}

/// A game event stamped with its update index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameEvent {
    /// Update the event occurred in
    pub update: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(update: u32, data: GameEventData) -> Self {
        Self { update, data }
    }

    /// Create a find event for either roster.
    pub fn found(update: u32, kind: HuntedKind, entity: EntityId, tile: TileCoord, revealed: bool, score: i32) -> Self {
        let data = match kind {
            HuntedKind::Zombie => GameEventData::ZombieFound {
                entity,
                tile,
                revealed,
                score,
            },
            HuntedKind::Human => GameEventData::HumanFound {
                entity,
                tile,
                revealed,
                score,
            },
        };
        Self::new(update, data)
    }

    /// Create a game over event.
    pub fn game_over(update: u32, score: i32) -> Self {
        Self::new(update, GameEventData::GameOver { score, updates: update })
    }
}
