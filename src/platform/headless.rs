use std::collections::VecDeque;
use std::time::Duration;

use image::RgbImage;

use crate::error::ChartResult;
use crate::interaction::{InputSource, KeyCode};
use crate::render::ComposedFrame;

use super::DisplaySurface;

/// Surface without a window: counts presented frames and replays scripted
/// key presses. Polls sleep for the requested timeout unless disabled.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    keys: VecDeque<KeyCode>,
    presented: usize,
    last_canvas_size: Option<(u32, u32)>,
    skip_sleep: bool,
    released: bool,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls return immediately instead of sleeping.
    #[must_use]
    pub fn without_sleep(mut self) -> Self {
        self.skip_sleep = true;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn queue_key(&mut self, key: KeyCode) {
        self.keys.push_back(key);
    }

    #[must_use]
    pub fn presented_frames(&self) -> usize {
        self.presented
    }

    /// Size of the last presented raster canvas, if the renderer produced one.
    #[must_use]
    pub fn last_canvas_size(&self) -> Option<(u32, u32)> {
        self.last_canvas_size
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl InputSource for HeadlessSurface {
    fn poll_key(&mut self, timeout: Duration) -> Option<KeyCode> {
        if !self.skip_sleep {
            std::thread::sleep(timeout);
        }
        self.keys.pop_front()
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl DisplaySurface for HeadlessSurface {
    fn present(&mut self, frame: &ComposedFrame, canvas: Option<&RgbImage>) -> ChartResult<()> {
        frame.validate()?;
        self.presented += 1;
        self.last_canvas_size = canvas.map(RgbImage::dimensions);
        Ok(())
    }
}
