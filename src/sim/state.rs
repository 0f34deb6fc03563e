//! Game state and core simulation types
//!
//! Everything the per-tick pipeline mutates lives in `GameState`, which is
//! owned by a single `Game` and never shared.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, reflect_velocity};
use super::powerup::{PowerUpKind, PowerUpSystem};
use super::score::ScoreTracker;
use super::wall::{Wall, generate_walls, wall_speed_multiplier};
use crate::audio::SoundEffect;
use crate::{limit, normalize};
use crate::settings::{Difficulty, PaddleSettings, Settings};

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for difficulty selection and start
    Menu,
    /// Active gameplay
    Playing,
    /// Match decided, waiting for restart or return to menu
    GameOver,
}

/// Which player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Color tags understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorTag {
    #[default]
    White,
    Gray,
    /// Speed boost tint
    Yellow,
    /// Speed reduction tint
    Blue,
    /// Size boost tint
    Green,
}

impl ColorTag {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ColorTag::White => [255, 255, 255],
            ColorTag::Gray => [128, 128, 128],
            ColorTag::Yellow => [255, 255, 0],
            ColorTag::Blue => [0, 0, 255],
            ColorTag::Green => [0, 255, 0],
        }
    }
}

/// Playfield dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Uniform sample in `[lo, hi)`, collapsing to the midpoint when the range is empty
pub(crate) fn random_in(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// The ball. `pos` is the top-left corner of its bounding square.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Target magnitude of `vel`
    pub speed: f32,
    pub base_speed: f32,
    pub color: ColorTag,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        let speed = vel.length();
        Self {
            pos,
            vel,
            size,
            speed,
            base_speed: speed,
            color: ColorTag::White,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius())
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    /// Advance one tick
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    /// Reflect velocity off a surface with unit normal `normal`
    pub fn bounce(&mut self, normal: Vec2) {
        self.vel = reflect_velocity(self.vel, normal);
    }

    /// Add to velocity; `speed` follows the new magnitude
    pub fn accelerate(&mut self, ax: f32, ay: f32) {
        self.vel += Vec2::new(ax, ay);
        self.speed = self.vel.length();
    }

    /// Clamp speed to `max`
    pub fn limit_speed(&mut self, max: f32) {
        self.vel = limit(self.vel, max);
        self.speed = self.vel.length();
    }

    /// Set the current speed, keeping direction
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.normalize_velocity();
    }

    /// Difficulty hook: sets both base and current speed
    pub fn set_base_speed(&mut self, speed: f32) {
        self.base_speed = speed;
        self.set_speed(speed);
    }

    /// Restore base speed (effect expiry)
    pub fn reset_speed(&mut self) {
        self.set_speed(self.base_speed);
    }

    /// Rescale velocity so its magnitude equals `speed`
    pub fn normalize_velocity(&mut self) {
        // A zero velocity stays zero
        self.vel = normalize(self.vel) * self.speed;
    }

    /// Respawn on the vertical center line with a random diagonal heading
    pub fn reset_position(&mut self, arena: &Arena, spawn_margin: f32, rng: &mut impl Rng) {
        self.pos.x = arena.width / 2.0 - self.radius();
        self.pos.y = random_in(rng, spawn_margin, arena.height - spawn_margin);

        let dx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let dy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(dx, dy);
        self.speed = self.base_speed;
        self.normalize_velocity();
    }
}

/// A player paddle. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Height outside of any size effect
    pub base_height: f32,
    pub speed: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    /// Speed gained per held tick
    pub force: f32,
    pub start_pos: Vec2,
    pub color: ColorTag,
    arena_height: f32,
    /// Vertical offset applied by the last `grow_to`, undone by `restore_height`
    size_shift: f32,
}

impl Paddle {
    pub fn new(start_pos: Vec2, settings: &PaddleSettings, arena_height: f32) -> Self {
        Self {
            pos: start_pos,
            width: settings.width,
            height: settings.height,
            base_height: settings.height,
            speed: settings.base_speed,
            base_speed: settings.base_speed,
            max_speed: settings.max_speed,
            force: settings.force,
            start_pos,
            color: ColorTag::White,
            arena_height,
            size_shift: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn move_up(&mut self) {
        self.pos.y -= self.speed;
        self.clamp_to_arena();
        self.ramp_speed();
    }

    pub fn move_down(&mut self) {
        self.pos.y += self.speed;
        self.clamp_to_arena();
        self.ramp_speed();
    }

    /// Movement key released
    pub fn reset_speed(&mut self) {
        self.speed = self.base_speed;
    }

    pub fn reset_position(&mut self) {
        self.pos = self.start_pos;
    }

    /// Change height about the vertical center, staying inside the arena
    pub fn grow_to(&mut self, height: f32) {
        let before = self.pos.y - self.size_shift;
        self.pos.y = before - (height - self.base_height) / 2.0;
        self.height = height;
        self.clamp_to_arena();
        self.size_shift = self.pos.y - before;
    }

    /// Back to `base_height`, undoing the shift `grow_to` applied
    pub fn restore_height(&mut self) {
        self.pos.y -= self.size_shift;
        self.size_shift = 0.0;
        self.height = self.base_height;
        self.clamp_to_arena();
    }

    fn clamp_to_arena(&mut self) {
        let max_y = (self.arena_height - self.height).max(0.0);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }

    fn ramp_speed(&mut self) {
        self.speed = (self.speed + self.force).min(self.max_speed);
    }
}

/// Running score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left: u32,
    pub right: u32,
    pub started: bool,
}

impl Scoreboard {
    pub fn point(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn total(&self) -> u32 {
        self.left + self.right
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    PowerUpSpawned { kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    EffectApplied(PowerUpKind),
    EffectExpired(PowerUpKind),
    Scored { side: Side, left: u32, right: u32 },
    WallsRegenerated { requested: u32, placed: usize },
    GameOver { winner: Side },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ball: Ball,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub walls: Vec<Wall>,
    /// Wall count last requested; placement may yield fewer
    pub wall_target: u32,
    pub score: ScoreTracker,
    pub power_ups: PowerUpSystem,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
}

impl GameState {
    /// Build a fresh session in the menu phase
    pub fn new(settings: Settings) -> Self {
        let arena = Arena::new(settings.arena.width, settings.arena.height);
        let mut rng = Pcg32::seed_from_u64(settings.seed);

        let p = &settings.paddle;
        let left_paddle = Paddle::new(Vec2::new(p.margin, p.start_y), p, arena.height);
        let right_paddle = Paddle::new(
            Vec2::new(arena.width - p.margin - p.width, p.start_y),
            p,
            arena.height,
        );

        let b = &settings.ball;
        let mut ball = Ball::new(Vec2::ZERO, Vec2::splat(b.start_component), b.size);
        ball.reset_position(&arena, b.spawn_margin, &mut rng);

        let score = ScoreTracker::from_paddles(
            &left_paddle,
            &right_paddle,
            settings.scoring.margin,
            settings.scoring.winning_score,
        );
        let power_ups = PowerUpSystem::new(&settings);

        let mut state = Self {
            difficulty: settings.difficulty,
            settings,
            arena,
            phase: GamePhase::Menu,
            time_ticks: 0,
            ball,
            left_paddle,
            right_paddle,
            walls: Vec::new(),
            wall_target: 0,
            score,
            power_ups,
            events: Vec::new(),
            rng,
        };
        let base = state.settings.walls.base_count;
        state.regenerate_walls(base);
        state
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Replace the wall set with `count` freshly placed walls
    pub fn regenerate_walls(&mut self, count: u32) {
        let w = &self.settings.walls;
        let multiplier = wall_speed_multiplier(count, w.base_count, w.speed_step);
        self.walls = generate_walls(count, w, &self.arena, multiplier, &mut self.rng);
        self.wall_target = count;
        log::info!("Walls regenerated: {} requested, {} placed", count, self.walls.len());
        self.emit(GameEvent::WallsRegenerated {
            requested: count,
            placed: self.walls.len(),
        });
    }

    /// Reset score, entities, walls and power-ups for a new match
    pub fn reset_match(&mut self) {
        self.score.scoreboard.reset();
        self.power_ups.clear_all_effects(
            &mut self.ball,
            &mut self.left_paddle,
            &mut self.right_paddle,
        );
        self.power_ups.clear_power_ups();
        self.ball
            .reset_position(&self.arena, self.settings.ball.spawn_margin, &mut self.rng);
        self.left_paddle.reset_position();
        self.left_paddle.reset_speed();
        self.right_paddle.reset_position();
        self.right_paddle.reset_speed();
        let base = self.settings.walls.base_count;
        self.regenerate_walls(base);
    }
}
