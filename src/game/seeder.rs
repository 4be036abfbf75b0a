//! Board Seeder
//!
//! Places every hunted entity on its own tile by rejection sampling:
//! draw a coordinate, redraw while the tile is taken. The roster is always
//! far smaller than the board, so the loop has no retry cap.

use tracing::debug;

use crate::core::coord::{TileCoord, BOARD_WIDTH};
use crate::core::rng::DeterministicRng;
use crate::game::board::{Board, Occupant};
use crate::game::entity::{Entity, EntityId, EntityKind};
use crate::game::setup::RosterEntry;

/// Source of candidate coordinates.
///
/// Placement redraws until it hits a free tile, so a sampler must
/// eventually produce every free coordinate it is asked for.
pub trait TileSampler {
    /// Draw a coordinate.
    fn sample(&mut self) -> TileCoord;
}

impl TileSampler for DeterministicRng {
    fn sample(&mut self) -> TileCoord {
        let x = self.next_int(BOARD_WIDTH as u32) as i32;
        let y = self.next_int(BOARD_WIDTH as u32) as i32;
        // next_int stays below BOARD_WIDTH, so clamping never moves the draw
        TileCoord::clamped(x, y).0
    }
}

/// Replays a fixed list of coordinates, cycling when exhausted.
///
/// The list must hold at least as many distinct free tiles as the roster
/// it seeds, or placement never finishes.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct ScriptedSampler {
    coords: Vec<TileCoord>,
    next: usize,
}

#[cfg(test)]
impl ScriptedSampler {
    /// Create from a non-empty coordinate list.
    pub(crate) fn new(coords: Vec<TileCoord>) -> Self {
        Self { coords, next: 0 }
    }
}

#[cfg(test)]
impl TileSampler for ScriptedSampler {
    fn sample(&mut self) -> TileCoord {
        if self.coords.is_empty() {
            return TileCoord::CENTER;
        }
        let coord = self.coords[self.next % self.coords.len()];
        self.next += 1;
        coord
    }
}

/// Seed the roster onto the board.
///
/// Ids are handed out from `first_id` in roster order. Returns the placed
/// entities, each bound to the tile that now records it.
pub fn seed_board<T: TileSampler + ?Sized>(
    board: &mut Board,
    roster: &[RosterEntry],
    first_id: u16,
    sampler: &mut T,
) -> Vec<Entity> {
    let mut placed = Vec::with_capacity(roster.len());

    for (offset, entry) in roster.iter().enumerate() {
        let id = EntityId(first_id + offset as u16);
        let mut coord = sampler.sample();
        while board.tile(coord).is_occupied() {
            coord = sampler.sample();
        }

        board.place_entity(coord, Occupant { entity: id, kind: entry.kind });
        debug!("{:?} {} ({}) seeded at {:?}", entry.kind, offset, entry.name, coord);

        placed.push(Entity::new(
            id,
            EntityKind::Hunted(entry.kind),
            entry.name.clone(),
            entry.transform,
            coord,
        ));
    }

    placed
}
