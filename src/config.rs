//! Session Configuration
//!
//! Tunables for a session, loadable from JSON. Every field has a default
//! so a config file only needs to name what it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::coord::TILE_COUNT;

/// Offset from a tile anchor to the slot a found entity is shown in.
pub const DEFAULT_REVEAL_OFFSET: Vec3 = Vec3::new(-0.7, -0.7, -1.3);

/// How the jump interpolator advances its step counter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JumpClock {
    /// One step per `update` call; animation speed follows frame rate.
    PerUpdate,
    /// One step per `step_seconds` of accumulated elapsed time.
    Elapsed {
        /// Duration of a single step
        step_seconds: f32,
    },
}

impl Default for JumpClock {
    fn default() -> Self {
        JumpClock::Elapsed {
            step_seconds: 1.0 / 60.0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Zombies on the board
    pub zombie_count: usize,
    /// Humans on the board
    pub human_count: usize,

    /// Scene name of the player transform
    pub player_name: String,
    /// Scene names of zombie transforms, in roster order
    pub zombie_names: Vec<String>,
    /// Scene names of human transforms, in roster order
    pub human_names: Vec<String>,
    /// Name prefix shared by every tile transform
    pub tile_prefix: String,

    /// World units per tile
    pub tile_size: f32,

    /// Steps in one jump arc
    pub jump_steps: u32,
    /// Arc curvature; the height parabola's leading coefficient is its negation
    pub jump_curvature: f32,
    /// Jump step driver
    pub jump_clock: JumpClock,

    /// How far the active tile sinks below its anchor
    pub cursor_depth: f32,
    /// Offset from a tile anchor to the found entity's display slot
    pub reveal_offset: Vec3,

    /// Tiles (per axis) within which an ambient loop is audible
    pub hearing_radius: i32,
    /// Falloff passed to the mixer when a loop starts
    pub sound_falloff: f32,
    /// Volume of an audible loop
    pub sound_volume: f32,
    /// Sample looped for zombies
    pub zombie_sample: String,
    /// Sample looped for humans
    pub human_sample: String,

    /// Seed for board placement; `None` draws one from entropy
    pub rng_seed: Option<u64>,

    /// Initial orbit radius
    pub camera_radius: f32,
    /// Initial orbit elevation (radians)
    pub camera_elevation: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            zombie_count: 5,
            human_count: 5,
            player_name: "Zombie".to_string(),
            zombie_names: (1..=5).map(|i| format!("Zombie.{:03}", i)).collect(),
            human_names: std::iter::once("grandma".to_string())
                .chain((1..=4).map(|i| format!("grandma.{:03}", i)))
                .collect(),
            tile_prefix: "Plate_Pavement".to_string(),
            tile_size: 2.0,
            jump_steps: 10,
            jump_curvature: 2.0,
            jump_clock: JumpClock::default(),
            cursor_depth: 0.3,
            reveal_offset: DEFAULT_REVEAL_OFFSET,
            hearing_radius: 1,
            sound_falloff: 10.0,
            sound_volume: 1.0,
            zombie_sample: "zombie_1.opus".to_string(),
            human_sample: "grandma_1.opus".to_string(),
            rng_seed: None,
            camera_radius: 20.0,
            camera_elevation: 0.8,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zombie_count == 0 {
            return Err(ConfigError::Invalid("zombie_count must be at least 1".into()));
        }
        // Placement is rejection sampled; it needs a free tile for every draw.
        if self.zombie_count + self.human_count >= TILE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "{} entities do not fit on {} tiles",
                self.zombie_count + self.human_count,
                TILE_COUNT
            )));
        }
        if self.zombie_names.len() < self.zombie_count {
            return Err(ConfigError::Invalid(format!(
                "{} zombie names for {} zombies",
                self.zombie_names.len(),
                self.zombie_count
            )));
        }
        if self.human_names.len() < self.human_count {
            return Err(ConfigError::Invalid(format!(
                "{} human names for {} humans",
                self.human_names.len(),
                self.human_count
            )));
        }
        if !(self.tile_size > 0.0) {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if self.jump_steps == 0 {
            return Err(ConfigError::Invalid("jump_steps must be at least 1".into()));
        }
        if !(self.jump_curvature >= 0.0) {
            return Err(ConfigError::Invalid("jump_curvature must not be negative".into()));
        }
        if let JumpClock::Elapsed { step_seconds } = self.jump_clock {
            if !(step_seconds > 0.0) {
                return Err(ConfigError::Invalid("step_seconds must be positive".into()));
            }
        }
        if self.hearing_radius < 0 {
            return Err(ConfigError::Invalid("hearing_radius must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.zombie_names.len(), 5);
        assert_eq!(config.human_names[0], "grandma");
        assert_eq!(config.human_names[4], "grandma.004");
        assert_ne!(config.reveal_offset, Vec3::ZERO);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "human_count": 4, "rng_seed": 7, "jump_clock": { "mode": "per_update" } }"#,
        )
        .unwrap();
        assert_eq!(config.human_count, 4);
        assert_eq!(config.zombie_count, 5);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.jump_clock, JumpClock::PerUpdate);
        assert_eq!(config.jump_steps, 10);
    }

    #[test]
    fn test_rejects_overfull_board() {
        let err = GameConfig::from_json_str(
            r#"{ "zombie_count": 30, "human_count": 19,
                 "zombie_names": [], "human_names": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_short_name_list() {
        let err = GameConfig::from_json_str(r#"{ "zombie_names": ["Zombie.001"] }"#).unwrap_err();
        assert!(err.to_string().contains("zombie names"));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
