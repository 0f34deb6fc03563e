//! Scoring and win detection
//!
//! A point is scored when the ball passes a threshold just outside the
//! defending paddle. Thresholds are derived from paddle geometry.

use serde::{Deserialize, Serialize};

use super::state::{Ball, GameEvent, GameState, Paddle, Scoreboard, Side};
use crate::audio::SoundEffect;

/// Result of an out-of-bounds check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOutcome {
    /// Ball still in play
    None,
    /// `Side` scored a point, match continues
    Point(Side),
    /// `Side` scored and reached the winning score
    Win(Side),
}

/// Score state plus the geometry that decides when a point is scored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub scoreboard: Scoreboard,
    /// Ball center x below this scores for the right player
    pub left_threshold: f32,
    /// Ball center x above this scores for the left player
    pub right_threshold: f32,
    pub winning_score: u32,
}

impl ScoreTracker {
    pub fn new(left_threshold: f32, right_threshold: f32, winning_score: u32) -> Self {
        Self {
            scoreboard: Scoreboard::default(),
            left_threshold,
            right_threshold,
            winning_score,
        }
    }

    /// Place each threshold `margin` beyond the outer edge of its paddle
    pub fn from_paddles(left: &Paddle, right: &Paddle, margin: f32, winning_score: u32) -> Self {
        Self::new(
            left.start_pos.x - margin,
            right.start_pos.x + right.width + margin,
            winning_score,
        )
    }

    /// Which side scores if the ball is where it is now
    pub fn scoring_side(&self, ball: &Ball) -> Option<Side> {
        let x = ball.center().x;
        if x < self.left_threshold {
            Some(Side::Right)
        } else if x > self.right_threshold {
            Some(Side::Left)
        } else {
            None
        }
    }

    /// Winner, if either side has reached the winning score
    pub fn winner(&self) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.scoreboard.get(side) >= self.winning_score)
    }
}

/// Award a point if the ball has left the field
///
/// On a point the ball is respawned and every running effect is reversed.
pub fn check_ball_out_of_bounds(state: &mut GameState) -> ScoreOutcome {
    let Some(side) = state.score.scoring_side(&state.ball) else {
        return ScoreOutcome::None;
    };

    let GameState {
        settings,
        arena,
        ball,
        left_paddle,
        right_paddle,
        score,
        power_ups,
        events,
        rng,
        ..
    } = state;

    score.scoreboard.point(side);
    events.push(GameEvent::Sound(SoundEffect::BallOut));
    events.push(GameEvent::Scored {
        side,
        left: score.scoreboard.left,
        right: score.scoreboard.right,
    });
    log::info!(
        "{:?} scores: {} - {}",
        side,
        score.scoreboard.left,
        score.scoreboard.right
    );

    ball.reset_position(arena, settings.ball.spawn_margin, rng);
    power_ups.clear_all_effects(ball, left_paddle, right_paddle);

    if score.scoreboard.get(side) >= score.winning_score {
        log::info!("{:?} wins", side);
        events.push(GameEvent::GameOver { winner: side });
        ScoreOutcome::Win(side)
    } else {
        ScoreOutcome::Point(side)
    }
}
