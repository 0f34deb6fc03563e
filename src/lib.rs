//! Wall Pong - two-player Pong with moving walls and power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, power-ups)
//! - `game`: Loop controller owning the simulation and its state machine
//! - `settings`: Data-driven game balance, loadable from JSON
//! - `audio`: Sound event sink abstraction
//! - `platform`: Input abstraction
//! - `renderer`: Drawing abstraction for a presentation layer

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per frame)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum ticks run per host frame (spiral-of-death guard)
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 1200.0;
    pub const WINDOW_HEIGHT: f32 = 800.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_BOOSTED_HEIGHT: f32 = 150.0;
    /// Distance of the left paddle from the left edge (mirrored on the right)
    pub const PADDLE_MARGIN: f32 = 30.0;
    pub const PADDLE_START_Y: f32 = 250.0;
    pub const PADDLE_BASE_SPEED: f32 = 1.5;
    pub const PADDLE_MAX_SPEED: f32 = 15.0;
    /// Speed gained per tick while a movement key is held
    pub const PADDLE_FORCE: f32 = 1.0;
    /// Horizontal kick given to the ball per unit of paddle speed
    pub const PADDLE_ENGLISH: f32 = 0.15;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 10.0;
    pub const BALL_START_COMPONENT: f32 = 4.0;
    pub const BALL_MAX_SPEED: f32 = 20.0;
    /// Speed reduction can't slow the ball below this
    pub const BALL_MIN_SPEED: f32 = 3.0;
    /// Vertical margin kept clear when respawning the ball
    pub const BALL_SPAWN_MARGIN: f32 = 100.0;

    /// Wall defaults
    pub const WALL_WIDTH: f32 = 10.0;
    pub const WALL_HEIGHT: f32 = 100.0;
    pub const WALL_BASE_COUNT: u32 = 4;
    pub const WALL_MAX_COUNT: u32 = 6;
    /// Points of combined score per extra wall
    pub const WALL_SCORE_STEP: u32 = 4;
    pub const WALL_MIN_DISTANCE: f32 = 60.0;
    pub const WALL_BASE_SPEED: f32 = 2.0;
    /// Wall speed gain per wall above the base count
    pub const WALL_SPEED_STEP: f32 = 0.1;
    /// Vertical margin kept clear when placing walls
    pub const WALL_EDGE_MARGIN: f32 = 80.0;
    /// Horizontal zone next to each side reserved for the paddles
    pub const WALL_PADDLE_ZONE: f32 = 60.0;
    /// Rejection-sampling budget per wall
    pub const WALL_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Power-up defaults
    pub const POWERUP_MAX_ACTIVE: usize = 5;
    pub const POWERUP_RADIUS: f32 = 20.0;
    pub const POWERUP_LIFETIME_SECS: f32 = 8.0;
    pub const EFFECT_DURATION_SECS: f32 = 5.0;
    pub const EFFECT_SPEED_DELTA: f32 = 3.0;
    pub const POWERUP_PADDLE_CHANCE: f64 = 0.2;
    pub const POWERUP_WALL_CHANCE: f64 = 0.7;
    pub const POWERUP_INSET_X: f32 = 200.0;
    pub const POWERUP_INSET_Y: f32 = 100.0;

    /// Scoring
    pub const WINNING_SCORE: u32 = 10;
    /// How far past a paddle's outer edge the ball must travel to score
    pub const SCORE_MARGIN: f32 = 10.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::TICKS_PER_SECOND as f32).round() as u64
}

/// Unit vector in the direction of `v`, or `v` itself when it has no length
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(v)
}

/// Scale `v` down so its magnitude is at most `max`
#[inline]
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}
