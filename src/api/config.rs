use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{AxisTuning, Layout, Margins, ScaleMode, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Public chart bootstrap configuration.
///
/// The value is immutable once handed to a chart; derived geometry comes from
/// [`PlotConfig::layout`] rather than a live getter. Serializable so host
/// applications can persist setups without inventing their own format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub y_min: f64,
    #[serde(default = "default_y_max")]
    pub y_max: f64,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_true")]
    pub smooth_scaling: bool,
    #[serde(default = "default_smoothing_speed")]
    pub smoothing_speed: f64,
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Minimum spacing between accepted pushes, in seconds. Zero disables.
    #[serde(default)]
    pub min_update_interval: f64,
    #[serde(default = "default_grid_x_spacing")]
    pub grid_x_spacing: u32,
    #[serde(default = "default_grid_y_divisions")]
    pub grid_y_divisions: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub show_fps: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default = "default_true")]
    pub show_zero_line: bool,
    #[serde(default = "default_true")]
    pub show_shortcuts_hint: bool,
    #[serde(default = "default_true")]
    pub antialiased: bool,
    /// Larger values are drawn higher on screen.
    #[serde(default = "default_true")]
    pub invert_y: bool,
    #[serde(default = "default_true")]
    pub enable_mouse_tooltip: bool,
    #[serde(default = "default_true")]
    pub enable_keyboard: bool,
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margins: Margins::default(),
            y_min: 0.0,
            y_max: default_y_max(),
            scale_mode: ScaleMode::default(),
            padding: default_padding(),
            smooth_scaling: true,
            smoothing_speed: default_smoothing_speed(),
            buffer_capacity: default_buffer_capacity(),
            min_update_interval: 0.0,
            grid_x_spacing: default_grid_x_spacing(),
            grid_y_divisions: default_grid_y_divisions(),
            title: String::new(),
            theme: default_theme(),
            show_fps: true,
            show_legend: true,
            show_zero_line: true,
            show_shortcuts_hint: true,
            antialiased: true,
            invert_y: true,
            enable_mouse_tooltip: true,
            enable_keyboard: true,
            screenshot_dir: default_screenshot_dir(),
            target_fps: default_target_fps(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_y_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    #[must_use]
    pub fn with_scale_mode(mut self, mode: ScaleMode) -> Self {
        self.scale_mode = mode;
        self
    }

    /// Sets padding ratio, smoothing toggle and smoothing speed together.
    #[must_use]
    pub fn with_axis_tuning(mut self, tuning: AxisTuning) -> Self {
        self.padding = tuning.padding_ratio;
        self.smooth_scaling = tuning.smoothing;
        self.smoothing_speed = tuning.smoothing_speed;
        self
    }

    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_min_update_interval(mut self, seconds: f64) -> Self {
        self.min_update_interval = seconds;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, x_spacing: u32, y_divisions: u32) -> Self {
        self.grid_x_spacing = x_spacing;
        self.grid_y_divisions = y_divisions;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    #[must_use]
    pub fn with_invert_y(mut self, invert_y: bool) -> Self {
        self.invert_y = invert_y;
        self
    }

    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_target_fps(mut self, target_fps: u32) -> Self {
        self.target_fps = target_fps;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Plot-area rectangle derived from size and margins.
    pub fn layout(&self) -> ChartResult<Layout> {
        Layout::from_margins(self.viewport(), self.margins)
    }

    #[must_use]
    pub fn axis_tuning(&self) -> AxisTuning {
        AxisTuning {
            padding_ratio: self.padding,
            smoothing: self.smooth_scaling,
            smoothing_speed: self.smoothing_speed,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.layout()?;
        self.axis_tuning().validate()?;

        if !self.y_min.is_finite() || !self.y_max.is_finite() || self.y_min > self.y_max {
            return Err(ChartError::InvalidConfig(format!(
                "y range must be finite with y_min <= y_max, got [{}, {}]",
                self.y_min, self.y_max
            )));
        }
        if self.buffer_capacity == 0 {
            return Err(ChartError::InvalidConfig(
                "buffer capacity must be > 0".to_owned(),
            ));
        }
        if !self.min_update_interval.is_finite() || self.min_update_interval < 0.0 {
            return Err(ChartError::InvalidConfig(
                "min update interval must be finite and >= 0".to_owned(),
            ));
        }
        if self.grid_x_spacing == 0 {
            return Err(ChartError::InvalidConfig(
                "grid x spacing must be > 0".to_owned(),
            ));
        }
        if self.grid_y_divisions == 0 {
            return Err(ChartError::InvalidConfig(
                "grid y divisions must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

/// Visual style of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub label: String,
    #[serde(default = "default_series_color")]
    pub color: Color,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_true")]
    pub show_dot: bool,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    #[serde(default = "default_true")]
    pub show_value: bool,
    #[serde(default = "default_true")]
    pub show_glow: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            label: String::new(),
            color: default_series_color(),
            line_width: default_line_width(),
            show_dot: true,
            dot_radius: default_dot_radius(),
            show_value: true,
            show_glow: true,
        }
    }
}

impl SeriesStyle {
    #[must_use]
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_dot(mut self, show_dot: bool, dot_radius: f64) -> Self {
        self.show_dot = show_dot;
        self.dot_radius = dot_radius;
        self
    }

    #[must_use]
    pub fn with_value_readout(mut self, show_value: bool) -> Self {
        self.show_value = show_value;
        self
    }

    #[must_use]
    pub fn with_glow(mut self, show_glow: bool) -> Self {
        self.show_glow = show_glow;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "series `{}` line width must be finite and > 0",
                self.label
            )));
        }
        if !self.dot_radius.is_finite() || self.dot_radius <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "series `{}` dot radius must be finite and > 0",
                self.label
            )));
        }
        self.color.validate()
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    480
}

fn default_y_max() -> f64 {
    100.0
}

fn default_padding() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_smoothing_speed() -> f64 {
    0.15
}

fn default_buffer_capacity() -> usize {
    200
}

fn default_grid_x_spacing() -> u32 {
    50
}

fn default_grid_y_divisions() -> u32 {
    8
}

fn default_theme() -> String {
    "dark".to_owned()
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_target_fps() -> u32 {
    60
}

fn default_series_color() -> Color {
    Color::rgb8(255, 100, 255)
}

fn default_line_width() -> f64 {
    2.0
}

fn default_dot_radius() -> f64 {
    5.0
}
