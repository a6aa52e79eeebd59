use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pixel margins between the canvas edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margins {
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(70, 50, 20, 40)
    }
}

/// Plot-area rectangle derived from a viewport and its margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Derives the plot area; fails when the margins leave no drawable space.
    pub fn from_margins(viewport: Viewport, margins: Margins) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let horizontal = u64::from(margins.left) + u64::from(margins.right);
        let vertical = u64::from(margins.top) + u64::from(margins.bottom);
        if horizontal >= u64::from(viewport.width) || vertical >= u64::from(viewport.height) {
            return Err(ChartError::InvalidConfig(format!(
                "margins ({}, {}, {}, {}) leave no plot area inside {}x{}",
                margins.left,
                margins.top,
                margins.right,
                margins.bottom,
                viewport.width,
                viewport.height
            )));
        }

        Ok(Self {
            x: f64::from(margins.left),
            y: f64::from(margins.top),
            width: f64::from(viewport.width) - horizontal as f64,
            height: f64::from(viewport.height) - vertical as f64,
        })
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Inclusive hit test used for crosshair placement.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}
