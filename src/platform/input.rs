//! Keyboard state
//!
//! Key events arrive between frames. Held keys (steering, jump) are sampled
//! every tick; presses of Enter/Escape and window close are one-shot and are
//! consumed by the first tick that sees them.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Confirm,
    Cancel,
    Left,
    Right,
    Jump,
    ToggleIdle,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Key::Confirm),
            "Escape" => Some(Key::Cancel),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Jump),
            "i" | "I" => Some(Key::ToggleIdle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    jump: bool,
    confirm: bool,
    cancel: bool,
    quit: bool,
    idle_mode: bool,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Confirm => self.confirm = true,
            Key::Cancel => self.cancel = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Jump => self.jump = true,
            Key::ToggleIdle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Jump => self.jump = false,
            Key::Confirm | Key::Cancel | Key::ToggleIdle => {}
        }
    }

    /// Request a pause (tab hidden, window blur)
    pub fn request_pause(&mut self) {
        self.cancel = true;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Drop held keys, e.g. when focus is lost and key-up events will not arrive
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.jump = false;
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    /// Input for the next tick; one-shot presses are cleared
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            confirm: self.confirm,
            cancel: self.cancel,
            quit: self.quit,
            left: self.left,
            right: self.right,
            jump: self.jump,
            idle_mode: self.idle_mode,
        };
        self.confirm = false;
        self.cancel = false;
        self.quit = false;
        input
    }
}
