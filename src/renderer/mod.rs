//! Rendering abstraction
//!
//! The core never draws by itself. A presentation layer implements
//! `Renderer` and calls `draw_frame` once per frame.

use glam::Vec2;

use crate::sim::{ColorTag, GamePhase, GameState};

/// Power-ups start blinking when this many ticks remain
pub const BLINK_THRESHOLD_TICKS: u64 = 120;
/// Blink period in ticks (visible half, hidden half)
const BLINK_PERIOD_TICKS: u64 = 16;

/// Primitive drawing backend
pub trait Renderer {
    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: ColorTag);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: ColorTag);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: ColorTag);
}

/// Whether a power-up with `remaining` ticks left is visible at `now`
pub fn blink_visible(remaining: u64, now: u64) -> bool {
    remaining > BLINK_THRESHOLD_TICKS || (now / (BLINK_PERIOD_TICKS / 2)) % 2 == 0
}

/// Draw every entity once, then the HUD for the current phase
pub fn draw_frame(state: &GameState, r: &mut dyn Renderer) {
    let arena = state.arena;

    if state.phase == GamePhase::Menu {
        r.draw_text("WALL PONG", Vec2::new(arena.width / 2.0, arena.height / 3.0), ColorTag::White);
        r.draw_text(
            &format!("Difficulty: {}", state.difficulty.as_str()),
            Vec2::new(arena.width / 2.0, arena.height / 2.0),
            ColorTag::Gray,
        );
        return;
    }

    for paddle in [&state.left_paddle, &state.right_paddle] {
        r.draw_rect(paddle.pos, Vec2::new(paddle.width, paddle.height), paddle.color);
    }
    for wall in &state.walls {
        r.draw_rect(wall.pos, Vec2::new(wall.width, wall.height), wall.color);
    }

    let now = state.time_ticks;
    for p in state.power_ups.power_ups() {
        if blink_visible(p.remaining_ticks(now), now) {
            r.draw_circle(p.pos, p.radius, p.kind.color());
        }
    }

    let ball = &state.ball;
    r.draw_circle(ball.center(), ball.radius(), ball.color);

    let board = &state.score.scoreboard;
    r.draw_text(
        &format!("{}   {}", board.left, board.right),
        Vec2::new(arena.width / 2.0, 40.0),
        ColorTag::White,
    );

    if state.phase == GamePhase::GameOver {
        if let Some(side) = state.score.winner() {
            r.draw_text(
                &format!("{side:?} player wins"),
                Vec2::new(arena.width / 2.0, arena.height / 2.0),
                ColorTag::Yellow,
            );
        }
    }
}
