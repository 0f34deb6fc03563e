//! Game loop controller
//!
//! Owns the simulation state and the audio manager, applies flow transitions
//! with their side effects, and turns wall-clock frame time into fixed ticks.

use crate::audio::{AudioManager, AudioSink, Music};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::InputSource;
use crate::settings::{Difficulty, Settings};
use crate::sim::{
    FlowEvent, GameEvent, GamePhase, GameState, ScoreOutcome, Side, tick, transition,
};

/// A game session
pub struct Game {
    state: GameState,
    audio: AudioManager,
    accumulator: f32,
}

impl Game {
    /// Start a session in the menu
    pub fn new(settings: Settings, sink: Box<dyn AudioSink>) -> Self {
        let audio = AudioManager::new(sink, &settings.audio);
        log::info!("New session, seed {}", settings.seed);
        let mut game = Self {
            state: GameState::new(settings),
            audio,
            accumulator: 0.0,
        };
        game.enter(GamePhase::Menu);
        game
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Winner of the last match, while on the game over screen
    pub fn winner(&self) -> Option<Side> {
        match self.state.phase {
            GamePhase::GameOver => self.state.score.winner(),
            _ => None,
        }
    }

    /// Feed a flow event. Returns `false` if it was ignored in the current phase.
    pub fn handle(&mut self, event: FlowEvent) -> bool {
        let from = self.state.phase;
        let Some(to) = transition(from, event) else {
            log::debug!("Ignored {:?} in {:?}", event, from);
            return false;
        };

        match event {
            FlowEvent::SelectDifficulty(difficulty) => {
                log::info!("Difficulty: {}", difficulty.as_str());
                self.state.difficulty = difficulty;
            }
            FlowEvent::Start | FlowEvent::Restart => {
                let speed = self.state.difficulty.ball_speed();
                self.state.ball.set_base_speed(speed);
                self.state.reset_match();
                log::info!(
                    "Match started ({}, ball speed {})",
                    self.state.difficulty.as_str(),
                    speed
                );
            }
            FlowEvent::Won(side) => {
                log::info!(
                    "Game over: {:?} wins {} - {}",
                    side,
                    self.state.score.scoreboard.left,
                    self.state.score.scoreboard.right
                );
            }
            FlowEvent::BackToMenu => {}
        }

        if to != from {
            self.exit(from);
            self.state.phase = to;
            self.enter(to);
        }
        true
    }

    fn enter(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Menu => self.audio.play_music(Music::Menu),
            GamePhase::Playing => {
                self.state.power_ups.clear_power_ups();
                let GameState {
                    ball,
                    left_paddle,
                    right_paddle,
                    power_ups,
                    ..
                } = &mut self.state;
                power_ups.clear_all_effects(ball, left_paddle, right_paddle);
                self.state.score.scoreboard.start();
                self.accumulator = 0.0;
            }
            GamePhase::GameOver => self.audio.play_music(Music::GameOver),
        }
    }

    fn exit(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Menu | GamePhase::GameOver => self.audio.stop_music(),
            GamePhase::Playing => {}
        }
    }

    /// Run exactly one simulation tick
    pub fn tick(&mut self, input: &dyn InputSource) {
        let first_new = self.state.events.len();
        let outcome = tick(&mut self.state, input);

        for event in &self.state.events[first_new..] {
            if let GameEvent::Sound(effect) = event {
                self.audio.play(*effect);
            }
        }

        if let ScoreOutcome::Win(side) = outcome {
            self.handle(FlowEvent::Won(side));
        }
    }

    /// Advance by `dt` seconds of wall-clock time. Returns the ticks run.
    pub fn update(&mut self, dt: f32, input: &dyn InputSource) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}
