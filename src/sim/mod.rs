//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies (sounds are emitted as events)

pub mod collision;
pub mod flow;
pub mod powerup;
pub mod score;
pub mod state;
pub mod tick;
pub mod wall;

pub use collision::{Aabb, check_collision, handle_collisions, reflect_velocity, resolve_collision};
pub use flow::{FlowEvent, transition};
pub use powerup::{ActiveEffect, PowerUp, PowerUpKind, PowerUpSystem};
pub use score::{ScoreOutcome, ScoreTracker, check_ball_out_of_bounds};
pub use state::{
    Arena, Ball, ColorTag, GameEvent, GamePhase, GameState, Paddle, Scoreboard, Side,
};
pub use tick::tick;
pub use wall::{Wall, calculate_wall_count, generate_walls, wall_speed_multiplier};
