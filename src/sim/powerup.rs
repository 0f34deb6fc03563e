//! Power-ups and timed effects
//!
//! A power-up is spawned, then either collected by the ball or expires.
//! Collecting one starts an effect that modifies the ball or paddles until
//! its duration runs out, at which point the modification is reversed.
//! All timing is in simulation ticks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Arena, Ball, ColorTag, GameEvent, Paddle, random_in};
use crate::audio::SoundEffect;
use crate::settings::Settings;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    SpeedReduction,
    SizeBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::SpeedReduction,
        PowerUpKind::SizeBoost,
    ];

    /// Modifies ball speed
    pub fn is_speed(&self) -> bool {
        matches!(self, PowerUpKind::SpeedBoost | PowerUpKind::SpeedReduction)
    }

    /// Tint applied to affected entities (and used to draw the pickup)
    pub fn color(&self) -> ColorTag {
        match self {
            PowerUpKind::SpeedBoost => ColorTag::Yellow,
            PowerUpKind::SpeedReduction => ColorTag::Blue,
            PowerUpKind::SizeBoost => ColorTag::Green,
        }
    }
}

/// A collectible on the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub spawn_tick: u64,
    pub lifetime_ticks: u64,
}

impl PowerUp {
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawn_tick) >= self.lifetime_ticks
    }

    /// Ticks left before expiry (for blinking UIs)
    pub fn remaining_ticks(&self, now: u64) -> u64 {
        self.lifetime_ticks
            .saturating_sub(now.saturating_sub(self.spawn_tick))
    }

    pub fn is_colliding(&self, ball: &Ball) -> bool {
        ball.center().distance(self.pos) < ball.radius() + self.radius
    }
}

/// An effect currently modifying entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub start_tick: u64,
    pub duration_ticks: u64,
}

impl ActiveEffect {
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.start_tick) >= self.duration_ticks
    }
}

/// Spawning, collection and the effect lifecycle
#[derive(Debug, Clone)]
pub struct PowerUpSystem {
    power_ups: Vec<PowerUp>,
    effects: Vec<ActiveEffect>,
    max_active: usize,
    radius: f32,
    lifetime_ticks: u64,
    effect_ticks: u64,
    speed_delta: f32,
    min_ball_speed: f32,
    boosted_height: f32,
    inset: Vec2,
}

impl PowerUpSystem {
    pub fn new(settings: &Settings) -> Self {
        let p = &settings.power_ups;
        Self {
            power_ups: Vec::new(),
            effects: Vec::new(),
            max_active: p.max_active,
            radius: p.radius,
            lifetime_ticks: settings.powerup_lifetime_ticks(),
            effect_ticks: settings.effect_duration_ticks(),
            speed_delta: p.speed_delta,
            min_ball_speed: settings.ball.min_speed,
            boosted_height: settings.paddle.boosted_height,
            inset: Vec2::new(p.inset_x, p.inset_y),
        }
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Default duration for effects started by collection
    pub fn effect_duration_ticks(&self) -> u64 {
        self.effect_ticks
    }

    /// Spawn one power-up of a random kind inside the inset region
    ///
    /// Returns `None` without spawning when the on-screen cap is reached.
    pub fn spawn_random(
        &mut self,
        now: u64,
        arena: &Arena,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Option<PowerUpKind> {
        if self.power_ups.len() >= self.max_active {
            return None;
        }

        let pos = Vec2::new(
            random_in(rng, self.inset.x, arena.width - self.inset.x),
            random_in(rng, self.inset.y, arena.height - self.inset.y),
        );
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];

        self.spawn_at(kind, pos, now, events).then_some(kind)
    }

    /// Spawn a specific power-up centered at `pos`, unless the cap is reached
    pub fn spawn_at(
        &mut self,
        kind: PowerUpKind,
        pos: Vec2,
        now: u64,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.power_ups.len() >= self.max_active {
            return false;
        }

        self.power_ups.push(PowerUp {
            kind,
            pos,
            radius: self.radius,
            spawn_tick: now,
            lifetime_ticks: self.lifetime_ticks,
        });
        log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        events.push(GameEvent::PowerUpSpawned { kind, pos });
        events.push(GameEvent::Sound(SoundEffect::PowerUp));
        true
    }

    /// Spawn up to `count` power-ups, stopping at the cap. Returns how many spawned.
    pub fn spawn_multiple(
        &mut self,
        count: usize,
        now: u64,
        arena: &Arena,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        (0..count)
            .take_while(|_| self.spawn_random(now, arena, rng, events).is_some())
            .count()
    }

    /// Drop uncollected power-ups whose lifetime has run out
    pub fn update_power_ups(&mut self, now: u64, events: &mut Vec<GameEvent>) {
        self.power_ups.retain(|p| {
            let expired = p.is_expired(now);
            if expired {
                events.push(GameEvent::PowerUpExpired(p.kind));
            }
            !expired
        });
    }

    /// Remove and return the first power-up the ball overlaps
    pub fn check_collisions(&mut self, ball: &Ball) -> Option<PowerUp> {
        let index = self.power_ups.iter().position(|p| p.is_colliding(ball))?;
        Some(self.power_ups.remove(index))
    }

    /// Start an effect and modify the entities it targets
    ///
    /// Returns `false` (and changes nothing) if an effect of this kind is
    /// already running.
    pub fn apply_effect(
        &mut self,
        kind: PowerUpKind,
        duration_ticks: u64,
        now: u64,
        ball: &mut Ball,
        left: &mut Paddle,
        right: &mut Paddle,
    ) -> bool {
        if self.is_active(kind) {
            return false;
        }

        self.effects.push(ActiveEffect {
            kind,
            start_tick: now,
            duration_ticks,
        });

        match kind {
            PowerUpKind::SpeedBoost => {
                ball.set_speed(ball.speed + self.speed_delta);
                ball.color = kind.color();
            }
            PowerUpKind::SpeedReduction => {
                ball.set_speed((ball.speed - self.speed_delta).max(self.min_ball_speed));
                ball.color = kind.color();
            }
            PowerUpKind::SizeBoost => {
                for paddle in [left, right] {
                    paddle.grow_to(self.boosted_height);
                    paddle.color = kind.color();
                }
            }
        }
        log::debug!("Effect {:?} applied for {} ticks", kind, duration_ticks);
        true
    }

    /// Expire effects whose duration has elapsed, reversing them
    ///
    /// A speed effect leaves the ball alone on expiry while the opposite speed
    /// effect is still running; the survivor's speed and tint stay in place.
    pub fn update_effects(
        &mut self,
        now: u64,
        ball: &mut Ball,
        left: &mut Paddle,
        right: &mut Paddle,
        events: &mut Vec<GameEvent>,
    ) {
        let mut i = 0;
        while i < self.effects.len() {
            if self.effects[i].is_expired(now) {
                let effect = self.effects.remove(i);
                let speed_still_modified = effect.kind.is_speed()
                    && self
                        .effects
                        .iter()
                        .any(|e| e.kind.is_speed() && !e.is_expired(now));
                if !speed_still_modified {
                    reverse_effect(effect.kind, ball, left, right);
                }
                log::debug!("Effect {:?} expired", effect.kind);
                events.push(GameEvent::EffectExpired(effect.kind));
            } else {
                i += 1;
            }
        }
    }

    /// Reverse every running effect immediately (scoring, restart)
    pub fn clear_all_effects(&mut self, ball: &mut Ball, left: &mut Paddle, right: &mut Paddle) {
        for effect in self.effects.drain(..) {
            reverse_effect(effect.kind, ball, left, right);
        }
    }

    /// Remove every uncollected power-up
    pub fn clear_power_ups(&mut self) {
        self.power_ups.clear();
    }
}

fn reverse_effect(kind: PowerUpKind, ball: &mut Ball, left: &mut Paddle, right: &mut Paddle) {
    match kind {
        PowerUpKind::SpeedBoost | PowerUpKind::SpeedReduction => {
            ball.reset_speed();
            ball.color = ColorTag::White;
        }
        PowerUpKind::SizeBoost => {
            for paddle in [left, right] {
                paddle.restore_height();
                paddle.color = ColorTag::White;
            }
        }
    }
}
