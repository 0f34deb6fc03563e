//! Audio event routing
//!
//! The simulation only names sounds. A host supplies an `AudioSink` that
//! actually plays them; `AudioManager` applies volume settings and makes sure
//! a failing sink never interrupts the game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits top or bottom edge
    WallHit,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits an obstacle wall
    BallHitWall,
    /// Ball left the playfield (point scored)
    BallOut,
    /// Power-up spawned or collected
    PowerUp,
}

impl SoundEffect {
    /// Stable event name for sinks that key assets by name
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::BallHitWall => "ball_hit_wall",
            SoundEffect::BallOut => "ball_out",
            SoundEffect::PowerUp => "power_up",
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Music {
    Menu,
    GameOver,
}

impl Music {
    pub fn as_str(&self) -> &'static str {
        match self {
            Music::Menu => "menu_music",
            Music::GameOver => "game_over",
        }
    }
}

/// Failure reported by an audio backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Asset for the named event isn't loaded
    Missing(&'static str),
    /// Backend refused the request
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Missing(name) => write!(f, "sound '{name}' is not loaded"),
            AudioError::Backend(msg) => write!(f, "audio backend error: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play sounds
pub trait AudioSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    fn play_music(&mut self, track: Music, volume: f32) -> Result<(), AudioError>;
    fn stop_music(&mut self) -> Result<(), AudioError>;
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_effect(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_music(&mut self, _track: Music, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that writes each request to the log (headless runs)
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    playing: Option<Music>,
}

impl AudioSink for LogAudio {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("sfx {} @ {:.2}", effect.as_str(), volume);
        Ok(())
    }

    fn play_music(&mut self, track: Music, volume: f32) -> Result<(), AudioError> {
        log::debug!("music {} @ {:.2}", track.as_str(), volume);
        self.playing = Some(track);
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        if let Some(track) = self.playing.take() {
            log::debug!("music {} stopped", track.as_str());
        }
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentAudio), &AudioSettings::default())
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &AudioSettings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play_effect(effect, vol) {
            log::warn!("Failed to play {}: {e}", effect.as_str());
        }
    }

    /// Start a music track, stopping whatever was playing
    pub fn play_music(&mut self, track: Music) {
        self.stop_music();
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play_music(track, vol) {
            log::warn!("Failed to play {}: {e}", track.as_str());
        }
    }

    pub fn stop_music(&mut self) {
        if let Err(e) = self.sink.stop_music() {
            log::warn!("Failed to stop music: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records requests into a shared log, optionally failing every call
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl AudioSink for Recorder {
        fn play_effect(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            self.log.borrow_mut().push(effect.as_str().to_string());
            if self.fail {
                return Err(AudioError::Missing(effect.as_str()));
            }
            Ok(())
        }

        fn play_music(&mut self, track: Music, _volume: f32) -> Result<(), AudioError> {
            self.log.borrow_mut().push(format!("music:{}", track.as_str()));
            if self.fail {
                return Err(AudioError::Backend("device lost".into()));
            }
            Ok(())
        }

        fn stop_music(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().push("stop".to_string());
            Ok(())
        }
    }

    fn manager(fail: bool, settings: &AudioSettings) -> (AudioManager, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Recorder {
            log: Rc::clone(&log),
            fail,
        };
        (AudioManager::new(Box::new(sink), settings), log)
    }

    #[test]
    fn test_failures_are_swallowed() {
        let (mut audio, log) = manager(true, &AudioSettings::default());
        audio.play(SoundEffect::PaddleHit);
        audio.play_music(Music::Menu);
        assert_eq!(*log.borrow(), vec!["paddle_hit", "stop", "music:menu_music"]);
    }

    #[test]
    fn test_muted_skips_sink() {
        let settings = AudioSettings {
            muted: true,
            ..Default::default()
        };
        let (mut audio, log) = manager(false, &settings);
        audio.play(SoundEffect::WallHit);
        assert!(log.borrow().is_empty());

        audio.set_muted(false);
        audio.play(SoundEffect::WallHit);
        assert_eq!(*log.borrow(), vec!["wall_hit"]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AudioError::Missing("ball_out").to_string(),
            "sound 'ball_out' is not loaded"
        );
    }
}
