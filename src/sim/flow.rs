//! Game flow state machine
//!
//! Transitions are a pure table: the current phase plus an event gives the
//! next phase, or `None` if the event means nothing in that phase. Side
//! effects of entering/leaving a phase are applied by `Game`.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, Side};
use crate::settings::Difficulty;

/// Inputs that drive the flow between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    /// Pick a difficulty in the menu
    SelectDifficulty(Difficulty),
    /// Start a match from the menu
    Start,
    /// A player reached the winning score
    Won(Side),
    /// Play again from the game over screen
    Restart,
    /// Leave the game over screen
    BackToMenu,
}

/// Next phase for `event` in `phase`
pub fn transition(phase: GamePhase, event: FlowEvent) -> Option<GamePhase> {
    use FlowEvent::*;
    use GamePhase::*;

    match (phase, event) {
        (Menu, SelectDifficulty(_)) => Some(Menu),
        (Menu, Start) => Some(Playing),
        (Playing, Won(_)) => Some(GameOver),
        (GameOver, Restart) => Some(Playing),
        (GameOver, BackToMenu) => Some(Menu),
        _ => None,
    }
}
