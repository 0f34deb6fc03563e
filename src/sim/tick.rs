//! Fixed timestep simulation tick
//!
//! One call advances a Playing match by one frame:
//! input → paddles → ball → collisions → power-ups/effects → scoring → walls.

use super::collision::handle_collisions;
use super::score::{ScoreOutcome, check_ball_out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState, Paddle};
use super::wall::calculate_wall_count;
use crate::audio::SoundEffect;
use crate::platform::{InputSource, Key};

/// Advance the game state by one tick
///
/// Does nothing outside the Playing phase. Returns the scoring outcome so the
/// caller can drive the flow on a win.
pub fn tick(state: &mut GameState, input: &dyn InputSource) -> ScoreOutcome {
    if state.phase != GamePhase::Playing {
        return ScoreOutcome::None;
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    // Paddles
    steer(&mut state.left_paddle, input, Key::LeftUp, Key::LeftDown);
    steer(&mut state.right_paddle, input, Key::RightUp, Key::RightDown);

    state.ball.step();

    handle_collisions(state);

    // Power-ups: expiry, collection, effect timers
    {
        let GameState {
            ball,
            left_paddle,
            right_paddle,
            power_ups,
            events,
            ..
        } = state;

        power_ups.update_power_ups(now, events);

        if let Some(collected) = power_ups.check_collisions(ball) {
            let kind = collected.kind;
            log::debug!("Collected {:?}", kind);
            events.push(GameEvent::PowerUpCollected(kind));
            let duration = power_ups.effect_duration_ticks();
            if power_ups.apply_effect(kind, duration, now, ball, left_paddle, right_paddle) {
                events.push(GameEvent::EffectApplied(kind));
                events.push(GameEvent::Sound(SoundEffect::PowerUp));
            }
        }

        power_ups.update_effects(now, ball, left_paddle, right_paddle, events);
    }

    let outcome = check_ball_out_of_bounds(state);

    // Difficulty ramp
    let required = calculate_wall_count(
        state.score.scoreboard.total(),
        state.settings.walls.base_count,
    );
    if required != state.wall_target {
        state.regenerate_walls(required);
    }

    outcome
}

/// Move a paddle from its two keys; up wins if both are held
fn steer(paddle: &mut Paddle, input: &dyn InputSource, up: Key, down: Key) {
    if input.is_down(up) {
        paddle.move_up();
    } else if input.is_down(down) {
        paddle.move_down();
    } else {
        paddle.reset_speed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::KeyState;
    use crate::settings::Settings;
    use crate::sim::powerup::PowerUpKind;
    use crate::sim::state::Side;
    use glam::Vec2;

    fn playing(settings: Settings) -> GameState {
        let mut state = GameState::new(settings);
        state.phase = GamePhase::Playing;
        state.events.clear();
        state
    }

    fn quiet() -> Settings {
        let mut settings = Settings::default();
        settings.power_ups.paddle_hit_chance = 0.0;
        settings.power_ups.wall_hit_chance = 0.0;
        settings
    }

    #[test]
    fn test_no_tick_outside_playing() {
        let mut state = GameState::new(Settings::default());
        let ball = state.ball.pos;
        assert_eq!(tick(&mut state, &KeyState::new()), ScoreOutcome::None);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.ball.pos, ball);
    }

    #[test]
    fn test_paddles_follow_input() {
        let mut state = playing(quiet());
        state.walls.clear();
        let input = KeyState::new().with(Key::LeftDown).with(Key::RightUp);
        tick(&mut state, &input);

        assert_eq!(state.left_paddle.pos.y, 251.5);
        assert_eq!(state.left_paddle.speed, 2.5);
        assert_eq!(state.right_paddle.pos.y, 248.5);

        // Release: speed drops back to base
        tick(&mut state, &KeyState::new());
        assert_eq!(state.left_paddle.speed, 1.5);
        assert_eq!(state.left_paddle.pos.y, 251.5);
    }

    #[test]
    fn test_ball_moves_each_tick() {
        let mut state = playing(quiet());
        state.walls.clear();
        state.regenerate_walls(0);
        state.settings.walls.base_count = 0;
        state.ball.pos = Vec2::new(600.0, 400.0);
        state.ball.vel = Vec2::new(3.0, -4.0);
        tick(&mut state, &KeyState::new());
        assert_eq!(state.ball.pos, Vec2::new(603.0, 396.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_collecting_power_up_applies_effect() {
        let mut state = playing(quiet());
        state.settings.walls.base_count = 0;
        state.regenerate_walls(0);
        state.ball.pos = Vec2::new(600.0, 400.0);
        state.ball.vel = Vec2::new(1.0, 0.0);
        state.ball.set_base_speed(5.0);

        // Sits exactly where the ball center lands after one step
        state.power_ups.spawn_at(
            PowerUpKind::SpeedBoost,
            Vec2::new(610.0, 405.0),
            0,
            &mut state.events,
        );
        state.events.clear();

        tick(&mut state, &KeyState::new());
        assert!(state.power_ups.power_ups().is_empty());
        assert!(state.power_ups.is_active(PowerUpKind::SpeedBoost));
        assert!((state.ball.speed - 8.0).abs() < 1e-5);
        assert!(state.events.contains(&GameEvent::PowerUpCollected(PowerUpKind::SpeedBoost)));
        assert!(state.events.contains(&GameEvent::EffectApplied(PowerUpKind::SpeedBoost)));

        // Applied at tick 1, so it runs out at tick 301
        let duration = state.power_ups.effect_duration_ticks();
        for _ in 1..duration {
            state.ball.pos = Vec2::new(600.0, 400.0);
            tick(&mut state, &KeyState::new());
        }
        assert!(state.power_ups.is_active(PowerUpKind::SpeedBoost));

        state.ball.pos = Vec2::new(600.0, 400.0);
        tick(&mut state, &KeyState::new());
        assert!(!state.power_ups.is_active(PowerUpKind::SpeedBoost));
        assert!((state.ball.speed - 5.0).abs() < 1e-5);
        assert!(state.events.contains(&GameEvent::EffectExpired(PowerUpKind::SpeedBoost)));
    }

    #[test]
    fn test_same_seed_same_match() {
        let input = KeyState::new().with(Key::LeftUp).with(Key::RightDown);
        let run = || {
            let mut state = playing(Settings::default());
            for _ in 0..600 {
                tick(&mut state, &input);
            }
            (state.ball.pos, state.score.scoreboard.clone(), state.walls.len())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_scoring_adds_walls() {
        let mut state = playing(quiet());
        state.score.scoreboard.left = 3;
        state.ball.pos = Vec2::new(1190.0, 400.0);
        state.ball.vel = Vec2::new(4.0, 0.0);
        state.events.clear();

        let outcome = tick(&mut state, &KeyState::new());
        assert_eq!(outcome, ScoreOutcome::Point(Side::Left));
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::WallsRegenerated { requested: 5, .. }
        )));
        assert!(state.walls.len() <= 5);
    }
}
