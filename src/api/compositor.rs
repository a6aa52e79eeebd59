use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{AxisRange, AxisScaler, Layout, ScaleMode, Viewport};
use crate::error::ChartResult;
use crate::render::{ComposedFrame, OverlayLayerKind, RenderFrame};

use super::background_builder::build_background;
use super::overlay_builder::{
    append_crosshair, append_legend, append_status_bar, append_value_readouts,
};
use super::series_layer_builder::append_series;
use super::{PlotConfig, SeriesRegistry, Theme};

/// Read-only view handed to the scene builders for one frame.
#[derive(Debug, Clone, Copy)]
pub(super) struct SceneContext<'a> {
    pub config: &'a PlotConfig,
    pub theme: &'a Theme,
    pub viewport: Viewport,
    pub layout: Layout,
    pub range: AxisRange,
}

impl SceneContext<'_> {
    /// Maps a data value to a canvas y coordinate, clamped to the plot area.
    pub fn value_to_y(&self, value: f64) -> f64 {
        let norm = self.range.normalize(value);
        if self.config.invert_y {
            self.layout.y + (1.0 - norm) * self.layout.height
        } else {
            self.layout.y + norm * self.layout.height
        }
    }
}

/// Per-frame overlay inputs that are not part of the series data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStatus<'a> {
    pub fps: f64,
    pub paused: bool,
    /// Canvas-space mouse position, `None` while the pointer is outside.
    pub mouse: Option<(f64, f64)>,
    pub status_text: &'a str,
}

/// Builds composed frames, caching the static background behind a dirty flag.
///
/// The background (canvas fill, grid, axis labels, zero line, border, title)
/// is rebuilt only when the axis moved visibly, the theme or configuration
/// changed, or a caller marked it dirty. Otherwise consecutive frames share
/// the same background allocation.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    config: PlotConfig,
    layout: Layout,
    theme: Theme,
    axis: AxisScaler,
    background: Option<Arc<RenderFrame>>,
    dirty: bool,
    rebuild_count: u64,
}

impl FrameCompositor {
    pub fn new(config: PlotConfig, theme: Theme) -> ChartResult<Self> {
        config.validate()?;
        theme.validate()?;
        let layout = config.layout()?;
        let axis = AxisScaler::new(
            config.y_min,
            config.y_max,
            config.scale_mode,
            config.axis_tuning(),
        )?;
        Ok(Self {
            config,
            layout,
            theme,
            axis,
            background: None,
            dirty: true,
            rebuild_count: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn axis(&self) -> &AxisScaler {
        &self.axis
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.background.is_none()
    }

    /// Number of background rebuilds since construction.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_theme(&mut self, theme: Theme) -> ChartResult<()> {
        theme.validate()?;
        debug!(theme = %theme.name, "compositor theme changed");
        self.theme = theme;
        self.dirty = true;
        Ok(())
    }

    /// Overrides the axis range; invalidates the background.
    pub fn set_bounds(&mut self, lo: f64, hi: f64) -> ChartResult<()> {
        let update = self.axis.set_bounds(lo, hi)?;
        self.dirty |= update.dirty;
        Ok(())
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.axis.set_mode(mode);
        self.dirty = true;
    }

    /// Replaces the configuration, re-deriving layout and axis state.
    pub fn set_config(&mut self, config: PlotConfig) -> ChartResult<()> {
        config.validate()?;
        let layout = config.layout()?;
        let axis = AxisScaler::new(
            config.y_min,
            config.y_max,
            config.scale_mode,
            config.axis_tuning(),
        )?;
        self.config = config;
        self.layout = layout;
        self.axis = axis;
        self.dirty = true;
        Ok(())
    }

    /// Runs one scaling pass and composes the frame.
    pub fn render(
        &mut self,
        series: &SeriesRegistry,
        status: FrameStatus<'_>,
    ) -> ChartResult<ComposedFrame> {
        let update = self
            .axis
            .update(series.values().map(|s| s.buffer()), self.layout.height);
        self.dirty |= update.dirty;

        let viewport = self.config.viewport();
        let background = self.background_for_frame(viewport);
        let ctx = SceneContext {
            config: &self.config,
            theme: &self.theme,
            viewport,
            layout: self.layout,
            range: self.axis.displayed(),
        };

        let mut frame = ComposedFrame::new(viewport, background);
        if let Some(layer) = frame.layer_mut(OverlayLayerKind::Series) {
            append_series(layer, &ctx, series);
        }
        if let Some(layer) = frame.layer_mut(OverlayLayerKind::Legend) {
            append_legend(layer, &ctx, series);
        }
        if let Some(layer) = frame.layer_mut(OverlayLayerKind::Values) {
            append_value_readouts(layer, &ctx, series);
        }
        if let Some(layer) = frame.layer_mut(OverlayLayerKind::Crosshair) {
            append_crosshair(layer, &ctx, series, status.mouse);
        }
        if let Some(layer) = frame.layer_mut(OverlayLayerKind::StatusBar) {
            append_status_bar(layer, &ctx, status);
        }
        Ok(frame)
    }

    fn background_for_frame(&mut self, viewport: Viewport) -> Arc<RenderFrame> {
        if !self.dirty {
            if let Some(cached) = &self.background {
                return Arc::clone(cached);
            }
        }

        let ctx = SceneContext {
            config: &self.config,
            theme: &self.theme,
            viewport,
            layout: self.layout,
            range: self.axis.displayed(),
        };
        let background = Arc::new(build_background(&ctx));
        self.rebuild_count += 1;
        self.dirty = false;
        trace!(
            rebuilds = self.rebuild_count,
            lo = ctx.range.lo,
            hi = ctx.range.hi,
            "background rebuilt"
        );
        self.background = Some(Arc::clone(&background));
        background
    }
}
