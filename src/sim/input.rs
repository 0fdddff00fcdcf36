//! Per-frame input
//!
//! The platform layer samples a [`InputSnapshot`] once per frame. An
//! [`InputTracker`] compares it with the previous frame to derive rising
//! edges, producing the [`FrameInput`] the simulation consumes. Entities never
//! track "was pressed" flags themselves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Set of logical keys, packed into a bitfield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub bits: u16,
}

impl Keys {
    pub const LEFT: u16 = 1 << 0;
    pub const RIGHT: u16 = 1 << 1;
    pub const JUMP: u16 = 1 << 2;
    pub const SPRINT: u16 = 1 << 3;
    /// Direct-select the sword
    pub const WEAPON_1: u16 = 1 << 4;
    /// Direct-select the bow
    pub const WEAPON_2: u16 = 1 << 5;
    /// Toggle between weapons
    pub const WEAPON_CYCLE: u16 = 1 << 6;

    pub const NONE: Keys = Keys { bits: 0 };

    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn is_down(&self, key: u16) -> bool {
        self.bits & key != 0
    }

    #[inline]
    pub fn set(&mut self, key: u16, down: bool) {
        if down {
            self.bits |= key;
        } else {
            self.bits &= !key;
        }
    }

    /// Keys down now that were up in `previous`
    #[inline]
    pub const fn rising_from(&self, previous: Keys) -> Keys {
        Keys {
            bits: self.bits & !previous.bits,
        }
    }
}

/// Raw input sampled by the platform layer for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Keys currently held
    pub keys: Keys,
    /// Pointer position in world coordinates
    pub aim: Vec2,
    /// Primary action clicked since the last frame; the caller clears it
    pub primary_action: bool,
}

/// Input as seen by the simulation for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub held: Keys,
    /// Keys that went down this frame
    pub pressed: Keys,
    pub aim: Vec2,
    pub primary_action: bool,
}

impl FrameInput {
    #[inline]
    pub fn is_held(&self, key: u16) -> bool {
        self.held.is_down(key)
    }

    #[inline]
    pub fn was_pressed(&self, key: u16) -> bool {
        self.pressed.is_down(key)
    }

    /// Horizontal intent: -1, 0 or +1. Opposite keys cancel out.
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Keys::LEFT) {
            axis -= 1.0;
        }
        if self.is_held(Keys::RIGHT) {
            axis += 1.0;
        }
        axis
    }
}

/// Rising-edge detector over successive snapshots
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: Keys,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive this frame's input and remember the held keys for the next one
    pub fn frame(&mut self, snapshot: &InputSnapshot) -> FrameInput {
        let pressed = snapshot.keys.rising_from(self.previous);
        self.previous = snapshot.keys;
        FrameInput {
            held: snapshot.keys,
            pressed,
            aim: snapshot.aim,
            primary_action: snapshot.primary_action,
        }
    }

    /// Forget history, e.g. on level restart
    pub fn reset(&mut self) {
        self.previous = Keys::NONE;
    }
}
