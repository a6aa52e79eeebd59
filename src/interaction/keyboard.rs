use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const ESCAPE: u8 = 27;
const SPACE: u8 = b' ';

/// Step applied to the target frame rate by the `+` / `-` keys.
pub const FPS_KEY_STEP: i32 = 10;

/// Normalized 8-bit key code as delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(u8);

impl KeyCode {
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Normalizes a raw host key value.
    ///
    /// Negative values mean "no key"; everything else is masked to its low
    /// eight bits so extended codes from different platforms agree.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw < 0 {
            return None;
        }
        Some(Self((raw & 0xff) as u8))
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<char> for KeyCode {
    fn from(value: char) -> Self {
        Self((u32::from(value) & 0xff) as u8)
    }
}

/// Result of processing one key press.
///
/// At most one field is set for a single key; the default value is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyAction {
    pub quit: bool,
    pub toggle_pause: bool,
    pub screenshot: bool,
    pub reset: bool,
    pub toggle_recording: bool,
    pub cycle_theme: bool,
    pub fps_delta: i32,
}

impl KeyAction {
    #[must_use]
    pub fn from_key(key: Option<KeyCode>) -> Self {
        let Some(key) = key else {
            return Self::default();
        };

        let mut action = Self::default();
        match key.code() {
            b'q' | ESCAPE => action.quit = true,
            b'p' | SPACE => action.toggle_pause = true,
            b's' => action.screenshot = true,
            b'r' => action.reset = true,
            b'v' => action.toggle_recording = true,
            b't' => action.cycle_theme = true,
            b'+' | b'=' => action.fps_delta = FPS_KEY_STEP,
            b'-' | b'_' => action.fps_delta = -FPS_KEY_STEP,
            _ => {}
        }
        action
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Source of key presses that doubles as the pacer's wait primitive.
///
/// `poll_key` blocks for up to `timeout` (the host's event pump) and returns
/// the key pressed meanwhile, if any.
pub trait InputSource {
    fn poll_key(&mut self, timeout: Duration) -> Option<KeyCode>;

    /// Releases host resources (windows, event hooks). Idempotent.
    fn release(&mut self) {}
}

/// Deterministic input that replays queued keys and never blocks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<KeyCode>,
    polls: Vec<Duration>,
    released: bool,
}

impl ScriptedInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn queue(&mut self, key: KeyCode) {
        self.keys.push_back(key);
    }

    /// Timeouts requested so far, oldest first.
    #[must_use]
    pub fn polls(&self) -> &[Duration] {
        &self.polls
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl InputSource for ScriptedInput {
    fn poll_key(&mut self, timeout: Duration) -> Option<KeyCode> {
        self.polls.push(timeout);
        self.keys.pop_front()
    }

    fn release(&mut self) {
        self.released = true;
    }
}
