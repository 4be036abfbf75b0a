//! Scene Binding
//!
//! Resolves the named scene references a session needs and builds the
//! tile arena from the tile transforms. Any missing piece aborts session
//! start.

use crate::config::{ConfigError, GameConfig};
use crate::core::coord::TileCoord;
use crate::game::board::{Board, BoardError, Tile};
use crate::game::entity::HuntedKind;
use crate::scene::{SceneGraph, TransformHandle};

/// Unrecoverable session start errors.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Config failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The player transform is missing.
    #[error("player transform {0:?} not found")]
    MissingPlayer(String),

    /// A roster transform is missing.
    #[error("{kind:?} {index} ({name:?}) not found")]
    MissingEntity {
        /// Roster it belongs to
        kind: HuntedKind,
        /// Position in the roster
        index: usize,
        /// Expected scene name
        name: String,
    },

    /// The scene must hold exactly one camera.
    #[error("expecting scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),

    /// A tile transform sits outside the board.
    #[error("tile transform at {position:?} is outside the board")]
    TileOutsideBoard {
        /// Offending anchor
        position: [f32; 3],
    },

    /// Tile transforms do not cover the board exactly once.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A roster slot resolved against the scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    /// Scene name
    pub name: String,
    /// Roster kind
    pub kind: HuntedKind,
    /// Scene transform
    pub transform: TransformHandle,
}

/// Everything a session binds from the scene.
#[derive(Clone, Debug)]
pub struct SceneBindings {
    /// Player transform
    pub player: TransformHandle,
    /// Zombies first, then humans
    pub roster: Vec<RosterEntry>,
    /// Empty board built from tile transforms
    pub board: Board,
}

/// Resolve names and tiles from the scene.
pub fn bind_scene<S: SceneGraph>(scene: &S, config: &GameConfig) -> Result<SceneBindings, SetupError> {
    let player = scene
        .find_transform(&config.player_name)
        .ok_or_else(|| SetupError::MissingPlayer(config.player_name.clone()))?;

    let mut roster = Vec::with_capacity(config.zombie_count + config.human_count);
    let rosters = [
        (HuntedKind::Zombie, &config.zombie_names, config.zombie_count),
        (HuntedKind::Human, &config.human_names, config.human_count),
    ];
    for (kind, names, count) in rosters {
        for (index, name) in names.iter().take(count).enumerate() {
            let transform = scene.find_transform(name).ok_or_else(|| SetupError::MissingEntity {
                kind,
                index,
                name: name.clone(),
            })?;
            roster.push(RosterEntry {
                name: name.clone(),
                kind,
                transform,
            });
        }
    }

    let mut tiles = Vec::new();
    for handle in scene.transforms_with_prefix(&config.tile_prefix) {
        let anchor = scene.position(handle);
        let coord = TileCoord::from_world(anchor, config.tile_size).ok_or(SetupError::TileOutsideBoard {
            position: anchor.to_array(),
        })?;
        tiles.push(Tile::new(coord, handle, anchor));
    }
    let board = Board::from_tiles(tiles)?;

    let cameras = scene.camera_count();
    if cameras != 1 {
        return Err(SetupError::CameraCount(cameras));
    }

    Ok(SceneBindings { player, roster, board })
}
