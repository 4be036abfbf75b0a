//! Board Coordinates
//!
//! `TileCoord` can only hold a coordinate inside the board, so every
//! tile lookup made through it is in range by construction. Movement
//! goes through [`TileCoord::offset_clamped`], which applies the edge
//! clamp and reports whether the edge stopped the move.

use std::fmt;

use glam::Vec3;
use serde::Serialize;

/// Tiles per board axis.
pub const BOARD_WIDTH: i32 = 7;

/// Shift between logical coordinates `[-3, 3]` and storage indices `[0, 6]`.
pub const OFFSET: i32 = 3;

/// Total tile count.
pub const TILE_COUNT: usize = (BOARD_WIDTH * BOARD_WIDTH) as usize;

/// Clamp one axis into `[min, max)`.
///
/// Returns the clamped value and whether clamping altered it.
#[inline]
pub fn clamp_axis(value: i32, min: i32, max: i32) -> (i32, bool) {
    if value >= max {
        (max - 1, true)
    } else if value < min {
        (min, true)
    } else {
        (value, false)
    }
}

/// Integer step on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BoardDelta {
    /// Column change
    pub x: i32,
    /// Row change
    pub y: i32,
}

impl BoardDelta {
    /// No movement
    pub const ZERO: Self = Self { x: 0, y: 0 };
    /// One column left
    pub const LEFT: Self = Self { x: -1, y: 0 };
    /// One column right
    pub const RIGHT: Self = Self { x: 1, y: 0 };
    /// One row down
    pub const DOWN: Self = Self { x: 0, y: -1 };
    /// One row up
    pub const UP: Self = Self { x: 0, y: 1 };

    /// Create a delta.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when the delta moves nowhere.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// A coordinate inside the board, stored as indices `[0, BOARD_WIDTH)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    x: u8,
    y: u8,
}

impl TileCoord {
    /// Board center, where the player starts.
    pub const CENTER: Self = Self {
        x: OFFSET as u8,
        y: OFFSET as u8,
    };

    /// Create from storage indices. `None` when outside the board.
    pub fn new(x: i32, y: i32) -> Option<Self> {
        let in_range = |v: i32| (0..BOARD_WIDTH).contains(&v);
        if in_range(x) && in_range(y) {
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    /// Create from arbitrary indices, clamping each axis onto the board.
    ///
    /// The flag is true when either axis had to be clamped.
    pub fn clamped(x: i32, y: i32) -> (Self, bool) {
        let (cx, x_clamped) = clamp_axis(x, 0, BOARD_WIDTH);
        let (cy, y_clamped) = clamp_axis(y, 0, BOARD_WIDTH);
        (
            Self {
                x: cx as u8,
                y: cy as u8,
            },
            x_clamped || y_clamped,
        )
    }

    /// Convert a world-space anchor into a coordinate.
    ///
    /// The anchor is divided by the tile size, rounded to the nearest
    /// logical coordinate, then shifted by [`OFFSET`].
    pub fn from_world(position: Vec3, tile_size: f32) -> Option<Self> {
        if tile_size <= 0.0 {
            return None;
        }
        let x = (position.x / tile_size).round() as i32 + OFFSET;
        let y = (position.y / tile_size).round() as i32 + OFFSET;
        Self::new(x, y)
    }

    /// Column index.
    #[inline]
    pub fn x(self) -> i32 {
        self.x as i32
    }

    /// Row index.
    #[inline]
    pub fn y(self) -> i32 {
        self.y as i32
    }

    /// Coordinate with the offset removed, in `[-OFFSET, OFFSET]`.
    #[inline]
    pub fn logical(self) -> (i32, i32) {
        (self.x() - OFFSET, self.y() - OFFSET)
    }

    /// Row-major index into a board arena.
    #[inline]
    pub fn index(self) -> usize {
        self.y as usize * BOARD_WIDTH as usize + self.x as usize
    }

    /// Apply a delta and clamp the result onto the board.
    pub fn offset_clamped(self, delta: BoardDelta) -> (Self, bool) {
        Self::clamped(self.x() + delta.x, self.y() + delta.y)
    }

    /// Delta that moves `self` onto `other`.
    #[inline]
    pub fn delta_to(self, other: Self) -> BoardDelta {
        BoardDelta::new(other.x() - self.x(), other.y() - self.y())
    }

    /// Every coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = TileCoord> {
        (0..BOARD_WIDTH).flat_map(|y| (0..BOARD_WIDTH).map(move |x| Self { x: x as u8, y: y as u8 }))
    }
}

impl fmt::Debug for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.logical();
        write!(f, "{}, {}", x, y)
    }
}
