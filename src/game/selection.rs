//! Selection Resolver
//!
//! Classifies the active tile when the player commits. Scores and
//! found-counts live in [`Tally`]; scene side effects of a reveal (moving
//! the entity into view, muting its loop) are applied by the session from
//! the returned [`SelectionOutcome`].

use serde::Serialize;
use tracing::{info, warn};

use crate::core::coord::TileCoord;
use crate::core::direction::facing_toward;
use crate::game::board::Board;
use crate::game::entity::{EntityId, HuntedKind, Registry};

/// Score and progress of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Signed score
    pub score: i32,
    /// Zombies revealed so far
    pub zombies_found: usize,
    /// Humans revealed so far
    pub humans_found: usize,
    /// Set once every zombie is found; never cleared
    pub game_over: bool,
}

impl Tally {
    fn found_mut(&mut self, kind: HuntedKind) -> &mut usize {
        match kind {
            HuntedKind::Zombie => &mut self.zombies_found,
            HuntedKind::Human => &mut self.humans_found,
        }
    }
}

/// Result of one commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SelectionOutcome {
    /// Nothing on the tile; a point is lost and the tile stays unresolved.
    Empty {
        /// Committed tile
        tile: TileCoord,
    },
    /// Tile was counted before; nothing changes.
    AlreadyResolved {
        /// Committed tile
        tile: TileCoord,
    },
    /// First commit on an occupied tile.
    Resolved {
        /// Committed tile
        tile: TileCoord,
        /// Occupant
        entity: EntityId,
        /// Occupant kind
        kind: HuntedKind,
        /// The occupant was moved into view
        revealed: bool,
        /// This commit found the last zombie
        game_over: bool,
    },
}

impl SelectionOutcome {
    /// Score change this commit caused.
    pub fn score_delta(&self) -> i32 {
        match self {
            SelectionOutcome::Empty { .. } => -1,
            SelectionOutcome::AlreadyResolved { .. } => 0,
            SelectionOutcome::Resolved { kind: HuntedKind::Zombie, .. } => 1,
            SelectionOutcome::Resolved { kind: HuntedKind::Human, .. } => -1,
        }
    }
}

/// Resolve a commit on `coord`.
///
/// An unresolved zombie scores a point and a human costs one. Either is
/// revealed (flagged found and turned toward the player) while its
/// roster's found-count is below the roster size, and its tile is marked
/// resolved. Finding the last zombie ends the game.
pub fn resolve(
    board: &mut Board,
    registry: &mut Registry,
    tally: &mut Tally,
    coord: TileCoord,
) -> SelectionOutcome {
    let tile = board.tile(coord);
    let Some(occupant) = tile.occupant() else {
        tally.score -= 1;
        warn!("Commit on empty tile {:?}, score {}", coord, tally.score);
        return SelectionOutcome::Empty { tile: coord };
    };
    if tile.is_resolved() {
        return SelectionOutcome::AlreadyResolved { tile: coord };
    }

    let kind = occupant.kind;
    tally.score += match kind {
        HuntedKind::Zombie => 1,
        HuntedKind::Human => -1,
    };

    let roster_len = registry.roster_len(kind);
    let revealed = *tally.found_mut(kind) < roster_len;
    if revealed {
        let player_tile = registry.player().tile;
        if let Some(entity) = registry.get_mut(occupant.entity) {
            entity.found = true;
            if let Some(facing) = facing_toward(entity.tile, player_tile) {
                entity.facing = facing;
            }
        }
        *tally.found_mut(kind) += 1;
    }
    board.mark_resolved(coord);

    let game_over = kind == HuntedKind::Zombie && tally.zombies_found == registry.roster_len(HuntedKind::Zombie);
    if game_over {
        tally.game_over = true;
    }

    info!(
        "{:?} {:?} found at {:?}: score {}, zombies {}/{}",
        kind,
        occupant.entity,
        coord,
        tally.score,
        tally.zombies_found,
        registry.roster_len(HuntedKind::Zombie)
    );

    SelectionOutcome::Resolved {
        tile: coord,
        entity: occupant.entity,
        kind,
        revealed,
        game_over,
    }
}
