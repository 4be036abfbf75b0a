//! Board & Tile Store
//!
//! An arena of `BOARD_WIDTH²` tiles indexed by `TileCoord`. Tiles record
//! which hunted entity hides on them (by id, the registry owns entities)
//! and whether a commit has already resolved them.

use glam::Vec3;
use serde::Serialize;

use crate::core::coord::{TileCoord, TILE_COUNT};
use crate::game::entity::{EntityId, HuntedKind};
use crate::scene::TransformHandle;

/// Hunted entity standing on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Occupant {
    /// Registry id
    pub entity: EntityId,
    /// Zombie or human
    pub kind: HuntedKind,
}

/// One board tile.
#[derive(Clone, Debug)]
pub struct Tile {
    coord: TileCoord,
    transform: TransformHandle,
    anchor: Vec3,
    occupant: Option<Occupant>,
    resolved: bool,
}

impl Tile {
    /// Create an empty, unresolved tile.
    pub fn new(coord: TileCoord, transform: TransformHandle, anchor: Vec3) -> Self {
        Self {
            coord,
            transform,
            anchor,
            occupant: None,
            resolved: false,
        }
    }

    /// Board coordinate.
    #[inline]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Scene transform of the tile mesh.
    #[inline]
    pub fn transform(&self) -> TransformHandle {
        self.transform
    }

    /// World position captured at setup; jumps land on this height.
    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Hunted entity on this tile, if any.
    #[inline]
    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    /// True once a commit on this tile has been counted.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True when an entity hides here.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Board construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Two tile transforms map to one coordinate.
    #[error("two tiles at board coordinate {0:?}")]
    DuplicateTile(TileCoord),

    /// No tile transform maps to a coordinate.
    #[error("no tile at board coordinate {0:?}")]
    MissingTile(TileCoord),
}

/// The tile arena.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Build the board from tiles in any order.
    ///
    /// Every coordinate must be covered exactly once.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Result<Self, BoardError> {
        let mut slots: Vec<Option<Tile>> = vec![None; TILE_COUNT];
        for tile in tiles {
            let slot = &mut slots[tile.coord.index()];
            if slot.is_some() {
                return Err(BoardError::DuplicateTile(tile.coord));
            }
            *slot = Some(tile);
        }

        let mut ordered = Vec::with_capacity(TILE_COUNT);
        for (coord, slot) in TileCoord::all().zip(slots) {
            ordered.push(slot.ok_or(BoardError::MissingTile(coord))?);
        }
        Ok(Self { tiles: ordered })
    }

    /// Tile at a coordinate. Always present, `TileCoord` is in range.
    #[inline]
    pub fn tile(&self, coord: TileCoord) -> &Tile {
        &self.tiles[coord.index()]
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Place a hunted entity. No-op returning `false` if the tile is taken.
    pub fn place_entity(&mut self, coord: TileCoord, occupant: Occupant) -> bool {
        let tile = &mut self.tiles[coord.index()];
        if tile.occupant.is_some() {
            return false;
        }
        tile.occupant = Some(occupant);
        true
    }

    /// Mark a tile as counted. Idempotent.
    pub fn mark_resolved(&mut self, coord: TileCoord) {
        self.tiles[coord.index()].resolved = true;
    }

    /// Tiles with an occupant.
    pub fn occupied_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_occupied())
    }

    /// Number of occupied tiles.
    pub fn occupied_count(&self) -> usize {
        self.occupied_tiles().count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn empty_board() -> Board {
        Board::from_tiles(TileCoord::all().map(|c| {
            let (x, y) = c.logical();
            Tile::new(
                c,
                TransformHandle(c.index() as u32),
                Vec3::new(x as f32 * 2.0, y as f32 * 2.0, 0.0),
            )
        }))
        .unwrap()
    }

    fn zombie(id: u16) -> Occupant {
        Occupant {
            entity: EntityId(id),
            kind: HuntedKind::Zombie,
        }
    }

    #[test]
    fn test_board_is_complete() {
        let board = empty_board();
        assert_eq!(board.tiles().len(), TILE_COUNT);
        for coord in TileCoord::all() {
            assert_eq!(board.tile(coord).coord(), coord);
        }
    }

    #[test]
    fn test_duplicate_and_missing_tiles() {
        let mut tiles: Vec<Tile> = TileCoord::all()
            .map(|c| Tile::new(c, TransformHandle(0), Vec3::ZERO))
            .collect();
        tiles.push(Tile::new(TileCoord::CENTER, TransformHandle(0), Vec3::ZERO));
        assert_eq!(
            Board::from_tiles(tiles.clone()).unwrap_err(),
            BoardError::DuplicateTile(TileCoord::CENTER)
        );

        tiles.pop();
        tiles.remove(0);
        assert_eq!(
            Board::from_tiles(tiles).unwrap_err(),
            BoardError::MissingTile(TileCoord::new(0, 0).unwrap())
        );
    }

    #[test]
    fn test_place_entity_refuses_occupied() {
        let mut board = empty_board();
        assert!(board.place_entity(TileCoord::CENTER, zombie(1)));
        assert!(!board.place_entity(TileCoord::CENTER, zombie(2)));
        assert_eq!(board.tile(TileCoord::CENTER).occupant(), Some(zombie(1)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_mark_resolved_idempotent() {
        let mut board = empty_board();
        board.mark_resolved(TileCoord::CENTER);
        board.mark_resolved(TileCoord::CENTER);
        assert!(board.tile(TileCoord::CENTER).is_resolved());
        assert_eq!(board.tiles().iter().filter(|t| t.is_resolved()).count(), 1);
    }
}
