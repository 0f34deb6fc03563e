//! Platform abstraction layer
//!
//! The simulation only asks whether one of four logical keys is held. Mapping
//! physical keys (W/S, Up/Down) to these is the host's job.

use std::collections::HashSet;

/// Logical paddle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::LeftUp, Key::LeftDown, Key::RightUp, Key::RightDown];
}

/// Source of held-key state, polled once per tick
pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;
}

/// Plain set of held keys
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for scripted input
    pub fn with(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputSource for KeyState {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
