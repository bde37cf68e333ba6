use std::{fs, path::Path, time::Duration};

use merge_arena_core::balance::{AUTO_MERGE_INTERVAL, BOSS_TIME_LIMIT, WAVE_SPAWN_INTERVAL};
use merge_arena_world::Arena;
use serde::Deserialize;
use thiserror::Error;

/// Simulation speed multiplier selected by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum GameSpeed {
    /// Real time.
    #[default]
    Normal,
    /// Twice as fast.
    Double,
    /// Three times as fast.
    Triple,
}

impl GameSpeed {
    /// Multiplier applied to every raw frame delta.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Scales a raw frame delta into simulated time.
    #[must_use]
    pub fn scale(self, raw: Duration) -> Duration {
        raw.saturating_mul(self.multiplier())
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            other => Err(ConfigError::InvalidSpeed(other)),
        }
    }
}

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The requested game speed is not offered.
    #[error("game speed must be 1, 2 or 3, got {0}")]
    InvalidSpeed(u8),
    /// The arena dimensions are unusable.
    #[error("arena of {width}x{height} is too small")]
    InvalidArena {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

/// Tunables of a simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed shared by the world and the director.
    pub seed: u64,
    /// Arena width in world units.
    pub arena_width: f32,
    /// Arena height in world units.
    pub arena_height: f32,
    /// Initial game speed.
    pub speed: GameSpeed,
    /// Milliseconds between two director spawns.
    pub spawn_interval_ms: u64,
    /// Seconds a boss may stay before it escapes.
    pub boss_time_limit_secs: u64,
    /// Milliseconds between two auto-merge attempts.
    pub auto_merge_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let arena = Arena::default();
        Self {
            seed: 0,
            arena_width: arena.width(),
            arena_height: arena.height(),
            speed: GameSpeed::Normal,
            spawn_interval_ms: millis(WAVE_SPAWN_INTERVAL),
            boss_time_limit_secs: BOSS_TIME_LIMIT.as_secs(),
            auto_merge_interval_ms: millis(AUTO_MERGE_INTERVAL),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if !Arena::accepts(config.arena_width, config.arena_height) {
            return Err(ConfigError::InvalidArena {
                width: config.arena_width,
                height: config.arena_height,
            });
        }
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Director spawn interval.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Boss time limit.
    #[must_use]
    pub const fn boss_time_limit(&self) -> Duration {
        Duration::from_secs(self.boss_time_limit_secs)
    }

    /// Auto-merge cadence.
    #[must_use]
    pub const fn auto_merge_interval(&self) -> Duration {
        Duration::from_millis(self.auto_merge_interval_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
