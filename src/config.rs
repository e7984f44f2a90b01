//! Game tuning. Parsed from RON text by the binary; every field has a default
//! so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Bounds;

const NANOS_PER_MILLI: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("`{field}` must be greater than zero")]
    NotPositive { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical viewport width.
    pub width: f64,
    /// Logical viewport height.
    pub height: f64,
    pub star_count: usize,
    pub asteroid_count: usize,
    pub enemy_count: usize,
    /// Lives at the start of a run; also the upper bound for `World::lives`.
    pub lives: u32,
    /// Shield charges at the start of a run; crystals never raise it beyond this.
    pub shields: u32,
    pub shield_duration_ms: u64,
    /// Player rockets allowed on screen at once.
    pub max_rockets: usize,
    /// Minimum spacing between two simulation steps.
    pub tick_interval_ns: u64,
    pub boss_interval_ms: u64,
    pub crystal_interval_ms: u64,
    /// Delay between losing the last life and revealing the game-over screen.
    pub game_over_delay_ms: u64,
    /// How long the game-over screen stays up before returning to the menu.
    pub game_over_display_ms: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 350.0,
            height: 450.0,
            star_count: 100,
            asteroid_count: 15,
            enemy_count: 5,
            lives: 5,
            shields: 10,
            shield_duration_ms: 5_000,
            max_rockets: 3,
            tick_interval_ns: 33_333_333,
            boss_interval_ms: 20_000,
            crystal_interval_ms: 25_000,
            game_over_delay_ms: 1_000,
            game_over_display_ms: 5_000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a RON document.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 12] = [
            ("width", self.width > 0.0),
            ("height", self.height > 0.0),
            ("asteroid_count", self.asteroid_count > 0),
            ("enemy_count", self.enemy_count > 0),
            ("lives", self.lives > 0),
            ("shields", self.shields > 0),
            ("shield_duration_ms", self.shield_duration_ms > 0),
            ("max_rockets", self.max_rockets > 0),
            ("tick_interval_ns", self.tick_interval_ns > 0),
            ("boss_interval_ms", self.boss_interval_ms > 0),
            ("crystal_interval_ms", self.crystal_interval_ms > 0),
            ("game_over_display_ms", self.game_over_display_ms > 0),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(ConfigError::NotPositive { field: *field }),
            None => Ok(()),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn shield_duration_ns(&self) -> u64 {
        self.shield_duration_ms * NANOS_PER_MILLI
    }

    pub fn boss_interval_ns(&self) -> u64 {
        self.boss_interval_ms * NANOS_PER_MILLI
    }

    pub fn crystal_interval_ns(&self) -> u64 {
        self.crystal_interval_ms * NANOS_PER_MILLI
    }

    pub fn game_over_delay_ns(&self) -> u64 {
        self.game_over_delay_ms * NANOS_PER_MILLI
    }

    pub fn game_over_display_ns(&self) -> u64 {
        self.game_over_display_ms * NANOS_PER_MILLI
    }
}
