//! Game settings and balance
//!
//! Every tuning value the simulation reads lives here. Settings can be loaded
//! from a JSON file; missing fields fall back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty levels selectable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Ball base speed for this difficulty
    pub fn ball_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 4.0,
            Difficulty::Medium => 5.0,
            Difficulty::Hard => 6.0,
        }
    }
}

/// Playfield dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    /// Side length of the ball's bounding square
    pub size: f32,
    /// Magnitude of each component of the initial diagonal velocity
    pub start_component: f32,
    pub max_speed: f32,
    /// Floor for the speed reduction effect
    pub min_speed: f32,
    pub spawn_margin: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            size: BALL_SIZE,
            start_component: BALL_START_COMPONENT,
            max_speed: BALL_MAX_SPEED,
            min_speed: BALL_MIN_SPEED,
            spawn_margin: BALL_SPAWN_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    pub boosted_height: f32,
    pub margin: f32,
    pub start_y: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub force: f32,
    pub english: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            boosted_height: PADDLE_BOOSTED_HEIGHT,
            margin: PADDLE_MARGIN,
            start_y: PADDLE_START_Y,
            base_speed: PADDLE_BASE_SPEED,
            max_speed: PADDLE_MAX_SPEED,
            force: PADDLE_FORCE,
            english: PADDLE_ENGLISH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSettings {
    pub width: f32,
    pub height: f32,
    pub base_count: u32,
    pub min_distance: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub edge_margin: f32,
    pub paddle_zone: f32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            width: WALL_WIDTH,
            height: WALL_HEIGHT,
            base_count: WALL_BASE_COUNT,
            min_distance: WALL_MIN_DISTANCE,
            base_speed: WALL_BASE_SPEED,
            speed_step: WALL_SPEED_STEP,
            edge_margin: WALL_EDGE_MARGIN,
            paddle_zone: WALL_PADDLE_ZONE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpSettings {
    pub max_active: usize,
    pub radius: f32,
    pub lifetime_secs: f32,
    pub effect_secs: f32,
    pub speed_delta: f32,
    pub paddle_hit_chance: f64,
    pub wall_hit_chance: f64,
    pub inset_x: f32,
    pub inset_y: f32,
}

impl Default for PowerUpSettings {
    fn default() -> Self {
        Self {
            max_active: POWERUP_MAX_ACTIVE,
            radius: POWERUP_RADIUS,
            lifetime_secs: POWERUP_LIFETIME_SECS,
            effect_secs: EFFECT_DURATION_SECS,
            speed_delta: EFFECT_SPEED_DELTA,
            paddle_hit_chance: POWERUP_PADDLE_CHANCE,
            wall_hit_chance: POWERUP_WALL_CHANCE,
            inset_x: POWERUP_INSET_X,
            inset_y: POWERUP_INSET_Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub winning_score: u32,
    pub margin: f32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            winning_score: WINNING_SCORE,
            margin: SCORE_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaSettings,
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub walls: WallSettings,
    pub power_ups: PowerUpSettings,
    pub scoring: ScoringSettings,
    pub audio: AudioSettings,
    /// Difficulty preselected in the menu
    pub difficulty: Difficulty,
    /// RNG seed for the session
    pub seed: u64,
}

impl Settings {
    /// Parse settings from JSON (absent fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Power-up lifetime in ticks
    pub fn powerup_lifetime_ticks(&self) -> u64 {
        crate::secs_to_ticks(self.power_ups.lifetime_secs)
    }

    /// Effect duration in ticks
    pub fn effect_duration_ticks(&self) -> u64 {
        crate::secs_to_ticks(self.power_ups.effect_secs)
    }
}
