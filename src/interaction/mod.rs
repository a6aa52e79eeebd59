//! Host input funnel: key codes, key-to-action mapping and the shared mouse
//! position cell.

mod keyboard;
mod mouse;

pub use keyboard::{FPS_KEY_STEP, InputSource, KeyAction, KeyCode, ScriptedInput};
pub use mouse::{MouseEventSink, MouseTracker};
