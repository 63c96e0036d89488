//! Key state tracking and action bindings.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};

use crate::input::queue::{InputEvent, InputQueue};

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;

/// Key codes bound to each player action. Several keys may share an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    pub jump: Vec<u32>,
    pub left: Vec<u32>,
    pub right: Vec<u32>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            jump: vec![KEY_UP],
            left: vec![KEY_LEFT],
            right: vec![KEY_RIGHT],
        }
    }
}

/// Player intent for one fixed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub jump_just_pressed: bool,
    pub left_held: bool,
    pub right_held: bool,
}

/// Held and just-pressed keys, fed from the raw event queue.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<u32>,
    just_pressed: HashSet<u32>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a frame's events in. Key repeat does not count as a new press.
    pub fn apply(&mut self, events: &InputQueue) {
        for event in events.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => {
                    if self.held.insert(key_code) {
                        self.just_pressed.insert(key_code);
                    }
                }
                InputEvent::KeyUp { key_code } => {
                    self.held.remove(&key_code);
                }
                InputEvent::Custom { .. } => {}
            }
        }
    }

    /// Forget presses after they have been seen by one step.
    pub fn end_step(&mut self) {
        self.just_pressed.clear();
    }

    /// Release everything, e.g. on restart or when the page loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn is_just_pressed(&self, key_code: u32) -> bool {
        self.just_pressed.contains(&key_code)
    }

    pub fn snapshot(&self, bindings: &InputBindings) -> InputSnapshot {
        InputSnapshot {
            jump_just_pressed: bindings.jump.iter().any(|k| self.is_just_pressed(*k)),
            left_held: bindings.left.iter().any(|k| self.is_held(*k)),
            right_held: bindings.right.iter().any(|k| self.is_held(*k)),
        }
    }
}
