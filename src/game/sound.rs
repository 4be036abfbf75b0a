//! Ambient Sound Positioning
//!
//! Every hidden entity plays a loop placed around the listener by its
//! tile offset from the player. A loop is at full volume only while its
//! tile is within `hearing_radius` of the player on both axes, otherwise
//! silent. Found entities are muted for good.

use glam::Vec3;

use crate::config::GameConfig;
use crate::core::coord::{BoardDelta, TileCoord};
use crate::game::board::Board;
use crate::game::entity::{EntityId, HuntedKind, Registry};
use crate::scene::SoundSystem;

/// True when a tile offset is within `radius` tiles on both axes.
#[inline]
pub fn audible(offset: BoardDelta, radius: i32) -> bool {
    offset.x.abs() <= radius && offset.y.abs() <= radius
}

/// Volume for a tile offset: `volume` when audible, else silence.
#[inline]
pub fn ambient_volume(offset: BoardDelta, radius: i32, volume: f32) -> f32 {
    if audible(offset, radius) {
        volume
    } else {
        0.0
    }
}

/// Where and how loud one entity's loop should play this update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientCue {
    /// Entity owning the loop
    pub entity: EntityId,
    /// Selects the sample
    pub kind: HuntedKind,
    /// Tile offset from the player
    pub offset: BoardDelta,
    /// Listener-relative world position
    pub position: Vec3,
    /// Target volume
    pub volume: f32,
}

/// Compute cues for every occupied tile.
pub fn ambient_cues(
    board: &Board,
    registry: &Registry,
    player_tile: TileCoord,
    listener: Vec3,
    config: &GameConfig,
) -> Vec<AmbientCue> {
    board
        .occupied_tiles()
        .filter_map(|tile| {
            let occupant = tile.occupant()?;
            let offset = player_tile.delta_to(tile.coord());
            let found = registry.get(occupant.entity).map_or(false, |e| e.found);
            let volume = if found {
                0.0
            } else {
                ambient_volume(offset, config.hearing_radius, config.sound_volume)
            };
            Some(AmbientCue {
                entity: occupant.entity,
                kind: occupant.kind,
                offset,
                position: listener
                    + Vec3::new(
                        offset.x as f32 * config.tile_size,
                        offset.y as f32 * config.tile_size,
                        0.0,
                    ),
                volume,
            })
        })
        .collect()
}

/// Push cues to the mixer, starting each entity's loop on first use.
pub fn apply_cues<A: SoundSystem>(sound: &mut A, registry: &mut Registry, cues: &[AmbientCue], config: &GameConfig) {
    for cue in cues {
        let Some(entity) = registry.get_mut(cue.entity) else {
            continue;
        };
        match entity.sound {
            Some(handle) => {
                sound.set_position(handle, cue.position);
                sound.set_volume(handle, cue.volume);
            }
            None => {
                let sample = match cue.kind {
                    HuntedKind::Zombie => &config.zombie_sample,
                    HuntedKind::Human => &config.human_sample,
                };
                entity.sound = Some(sound.loop_3d(sample, cue.volume, cue.position, config.sound_falloff));
            }
        }
    }
}
