//! Wall Pong headless runner
//!
//! Plays one match with both paddles on autopilot and prints a JSON summary.
//!
//! Usage: `wall-pong [settings.json] [max_ticks]`

use serde::Serialize;

use wall_pong::audio::LogAudio;
use wall_pong::platform::{Key, KeyState};
use wall_pong::sim::{FlowEvent, GameEvent, GamePhase, GameState, Paddle, Side};
use wall_pong::{Game, Settings};

/// Default cap: ten minutes of play
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;
/// Paddle holds still when the ball is this close to its center
const DEAD_ZONE: f32 = 12.0;

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    difficulty: &'static str,
    ticks: u64,
    left: u32,
    right: u32,
    winner: Option<Side>,
    power_ups_collected: usize,
    walls: usize,
}

/// Both paddles chase the ball's vertical position
fn autopilot(state: &GameState) -> KeyState {
    let target = state.ball.center().y;
    let mut keys = KeyState::new();
    let mut steer = |paddle: &Paddle, up: Key, down: Key| {
        let center = paddle.pos.y + paddle.height / 2.0;
        if target < center - DEAD_ZONE {
            keys.press(up);
        } else if target > center + DEAD_ZONE {
            keys.press(down);
        }
    };
    steer(&state.left_paddle, Key::LeftUp, Key::LeftDown);
    steer(&state.right_paddle, Key::RightUp, Key::RightDown);
    keys
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };
    let max_ticks = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::warn!("Invalid tick limit ({e}), using {DEFAULT_MAX_TICKS}");
            DEFAULT_MAX_TICKS
        }
        None => DEFAULT_MAX_TICKS,
    };

    log::info!("Wall Pong (headless) starting...");
    let seed = settings.seed;
    let difficulty = settings.difficulty;
    let mut game = Game::new(settings, Box::new(LogAudio::default()));
    game.handle(FlowEvent::SelectDifficulty(difficulty));
    game.handle(FlowEvent::Start);

    let mut collected = 0;
    while game.phase() == GamePhase::Playing && game.state().time_ticks < max_ticks {
        let input = autopilot(game.state());
        game.tick(&input);
        collected += game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpCollected(_)))
            .count();
    }

    let state = game.state();
    if game.phase() == GamePhase::Playing {
        log::info!("Tick limit reached at {} ticks", state.time_ticks);
    }

    let summary = Summary {
        seed,
        difficulty: game.difficulty().as_str(),
        ticks: state.time_ticks,
        left: state.score.scoreboard.left,
        right: state.score.scoreboard.right,
        winner: game.winner(),
        power_ups_collected: collected,
        walls: state.walls.len(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}
