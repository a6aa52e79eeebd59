use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::capture::{VideoRecorder, save_screenshot};
use crate::core::{AxisScaler, ScaleMode};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{KeyAction, KeyCode, MouseEventSink, MouseTracker};
use crate::pacing::{Clock, FramePacer, MonotonicClock, TimingStrategy};
use crate::platform::DisplaySurface;
use crate::render::{ComposedFrame, Renderer};

use super::{
    FrameCompositor, FrameStatus, PlotConfig, Series, SeriesRegistry, SeriesStyle, Theme,
    ThemeRegistry,
};

/// Registry key of the series fed by [`LivePlot::push_default`].
pub const DEFAULT_SERIES: &str = "_default";
const DEFAULT_SERIES_LABEL: &str = "Value";

/// Lowest target rate reachable through the `-` key.
pub const MIN_KEYBOARD_FPS: i64 = 10;
const MAX_RECORDING_FPS: f64 = 30.0;

const STATUS_SAVED: Duration = Duration::from_secs(2);
const STATUS_CLEARED: Duration = Duration::from_millis(1500);
const STATUS_RECORDING: Duration = Duration::from_secs(1);
const STATUS_FAILED: Duration = Duration::from_secs(3);
const STATUS_THEME: Duration = Duration::from_millis(1500);
const STATUS_FPS: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusMessage {
    text: String,
    expires_at: Duration,
}

/// Real-time chart orchestrator.
///
/// Owns the series registry, compositor, renderer and pacer. Pushing data
/// renders a frame; [`LivePlot::step`] presents the latest frame, paces the
/// loop and applies the key pressed meanwhile.
///
/// All mutation goes through `&mut self`. Hosts that feed data from another
/// thread wrap the whole plot in one `Mutex`, so the series set, axis state
/// and cache flag always change together. Mouse input is the exception: hand
/// [`LivePlot::mouse_sink`] to the window callback.
#[derive(Debug)]
pub struct LivePlot<R: Renderer, S: DisplaySurface, C: Clock = MonotonicClock> {
    compositor: FrameCompositor,
    renderer: R,
    pacer: FramePacer<S, C>,
    series: SeriesRegistry,
    themes: ThemeRegistry,
    mouse: MouseTracker,
    recorder: VideoRecorder,
    paused: bool,
    status: Option<StatusMessage>,
    last_push_at: Option<Duration>,
    last_frame: Option<ComposedFrame>,
    closed: bool,
}

impl<R: Renderer, S: DisplaySurface> LivePlot<R, S, MonotonicClock> {
    /// Plot with the built-in themes and the wall clock.
    pub fn new(config: PlotConfig, renderer: R, surface: S) -> ChartResult<Self> {
        Self::with_parts(
            config,
            ThemeRegistry::new(),
            renderer,
            surface,
            MonotonicClock::new(),
        )
    }
}

impl<R: Renderer, S: DisplaySurface, C: Clock> LivePlot<R, S, C> {
    /// Plot with an explicit theme registry and time source.
    ///
    /// `config.theme` must name a theme in `themes`.
    pub fn with_parts(
        config: PlotConfig,
        themes: ThemeRegistry,
        renderer: R,
        surface: S,
        clock: C,
    ) -> ChartResult<Self> {
        config.validate()?;
        let theme = themes.get(&config.theme)?.clone();
        let recording_fps = if config.target_fps == 0 {
            MAX_RECORDING_FPS
        } else {
            f64::from(config.target_fps).min(MAX_RECORDING_FPS)
        };
        let recorder = VideoRecorder::new(
            config.width,
            config.height,
            recording_fps,
            config.screenshot_dir.clone(),
        );
        let pacer =
            FramePacer::with_clock(surface, clock, config.target_fps, TimingStrategy::default());
        let compositor = FrameCompositor::new(config, theme)?;
        debug!(
            renderer = renderer.backend_name(),
            theme = %compositor.theme().name,
            "live plot created"
        );

        Ok(Self {
            compositor,
            renderer,
            pacer,
            series: SeriesRegistry::new(),
            themes,
            mouse: MouseTracker::new(),
            recorder,
            paused: false,
            status: None,
            last_push_at: None,
            last_frame: None,
            closed: false,
        })
    }

    /// Replaces the video recorder, e.g. to inject a custom encoder list.
    #[must_use]
    pub fn with_recorder(mut self, recorder: VideoRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    /// Registers (or replaces) a series. Without a style the series gets its
    /// name as label and the next palette color of the current theme.
    pub fn add_series(&mut self, name: &str, style: Option<SeriesStyle>) -> ChartResult<()> {
        if name.trim().is_empty() {
            return Err(ChartError::InvalidConfig(
                "series name must not be empty".to_owned(),
            ));
        }
        let style = style.unwrap_or_else(|| {
            SeriesStyle::new(name, self.compositor.theme().series_color(self.series.len()))
        });
        let series = Series::new(name, style, self.compositor.config().buffer_capacity)?;
        debug!(series = %name, "register series");
        self.series.insert(name.to_owned(), series);
        self.compositor.mark_dirty();
        Ok(())
    }

    /// Removes a series; returns whether it existed.
    pub fn remove_series(&mut self, name: &str) -> bool {
        let removed = self.series.shift_remove(name).is_some();
        if removed {
            debug!(series = %name, "remove series");
            self.compositor.mark_dirty();
        }
        removed
    }

    /// Pushes into the reserved default series (created on first use,
    /// labelled "Value") and renders.
    pub fn push_default(&mut self, value: impl Into<Option<f64>>) -> ChartResult<&ComposedFrame> {
        if !self.series.contains_key(DEFAULT_SERIES) {
            let color = self.compositor.theme().series_color(self.series.len());
            self.add_series(
                DEFAULT_SERIES,
                Some(SeriesStyle::new(DEFAULT_SERIES_LABEL, color)),
            )?;
        }
        self.push_named(DEFAULT_SERIES, value)
    }

    /// Pushes into a registered series and renders.
    pub fn push_named(
        &mut self,
        name: &str,
        value: impl Into<Option<f64>>,
    ) -> ChartResult<&ComposedFrame> {
        if !self.series.contains_key(name) {
            return Err(ChartError::UnknownSeries(name.to_owned()));
        }
        if self.throttled() {
            return self.cached_frame();
        }
        if !self.paused {
            if let Some(series) = self.series.get_mut(name) {
                let value = value.into();
                trace!(series = %name, ?value, "push");
                series.buffer_mut().push(value);
            }
        }
        self.render_frame()
    }

    /// Pushes one value per named series, then renders once. Every name is
    /// checked before any value is stored.
    pub fn push_many<'a, I>(&mut self, values: I) -> ChartResult<&ComposedFrame>
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        let values: Vec<_> = values.into_iter().collect();
        if let Some((missing, _)) = values
            .iter()
            .find(|(name, _)| !self.series.contains_key(*name))
        {
            return Err(ChartError::UnknownSeries((*missing).to_owned()));
        }
        if self.throttled() {
            return self.cached_frame();
        }
        if !self.paused {
            for (name, value) in values {
                if let Some(series) = self.series.get_mut(name) {
                    series.buffer_mut().push(value);
                }
            }
        }
        self.render_frame()
    }

    /// Renders without pushing data.
    pub fn render(&mut self) -> ChartResult<&ComposedFrame> {
        self.render_frame()
    }

    /// Presents the latest frame, paces the loop and applies the key pressed
    /// meanwhile. Returns `true` when the user asked to quit.
    pub fn step(&mut self) -> ChartResult<bool> {
        if self.last_frame.is_none() {
            self.render_frame()?;
        }
        if let Some(frame) = &self.last_frame {
            let canvas = self.renderer.canvas();
            self.pacer.input_mut().present(frame, canvas)?;
            if let Some(canvas) = canvas.filter(|_| self.recorder.is_recording()) {
                self.recorder.write_frame(canvas)?;
            }
        }

        match self.pacer.tick() {
            Some(key) => self.handle_key(key),
            None => Ok(false),
        }
    }

    /// `push_named` followed by `step`.
    pub fn step_named(&mut self, name: &str, value: impl Into<Option<f64>>) -> ChartResult<bool> {
        self.push_named(name, value)?;
        self.step()
    }

    /// Applies one key press. Returns `true` on quit.
    pub fn handle_key(&mut self, key: KeyCode) -> ChartResult<bool> {
        let action = KeyAction::from_key(Some(key));
        if !self.compositor.config().enable_keyboard {
            return Ok(action.quit);
        }
        if action.quit {
            self.close();
            return Ok(true);
        }
        if action.toggle_pause {
            self.paused = !self.paused;
        }
        if action.screenshot {
            match self.screenshot() {
                Ok(path) => self.set_status(format!("Saved: {}", path.display()), STATUS_SAVED),
                Err(err) => {
                    warn!(error = %err, "screenshot failed");
                    self.set_status(format!("Screenshot failed: {err}"), STATUS_FAILED);
                }
            }
        }
        if action.reset {
            self.clear_all();
            self.set_status("Data cleared", STATUS_CLEARED);
        }
        if action.toggle_recording {
            self.toggle_recording();
        }
        if action.cycle_theme {
            let name = self.cycle_theme()?;
            self.set_status(format!("Theme: {name}"), STATUS_THEME);
        }
        if action.fps_delta != 0 {
            let target = (i64::from(self.pacer.target_rate()) + i64::from(action.fps_delta))
                .max(MIN_KEYBOARD_FPS);
            self.pacer.set_target_rate(target);
            self.set_status(format!("Target FPS: {target}"), STATUS_FPS);
        }
        Ok(false)
    }

    /// Writes the current raster canvas to the configured screenshot folder.
    pub fn screenshot(&self) -> ChartResult<PathBuf> {
        let canvas = self
            .renderer
            .canvas()
            .ok_or(ChartError::NoRasterCanvas(self.renderer.backend_name()))?;
        let path = save_screenshot(canvas, &self.compositor.config().screenshot_dir)?;
        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Starts or stops recording and reports the outcome in the status bar.
    pub fn toggle_recording(&mut self) {
        if self.recorder.is_recording() {
            match self.recorder.stop() {
                Ok(path) => {
                    let shown = path.map(|p| p.display().to_string()).unwrap_or_default();
                    self.set_status(format!("Recorded: {shown}"), STATUS_SAVED);
                }
                Err(err) => {
                    warn!(error = %err, "failed to finalize recording");
                    self.set_status(format!("Record failed: {err}"), STATUS_FAILED);
                }
            }
            return;
        }
        match self.recorder.start() {
            Ok(_) => self.set_status("Recording...", STATUS_RECORDING),
            Err(err) => {
                warn!(error = %err, "recording could not start");
                self.set_status(format!("Record failed: {err}"), STATUS_FAILED);
            }
        }
    }

    /// Clears one series' history.
    pub fn clear(&mut self, name: &str) -> ChartResult<()> {
        let series = self
            .series
            .get_mut(name)
            .ok_or_else(|| ChartError::UnknownSeries(name.to_owned()))?;
        series.buffer_mut().clear();
        Ok(())
    }

    pub fn clear_all(&mut self) {
        for series in self.series.values_mut() {
            series.buffer_mut().clear();
        }
        debug!(series = self.series.len(), "all series cleared");
    }

    pub fn set_bounds(&mut self, lo: f64, hi: f64) -> ChartResult<()> {
        self.compositor.set_bounds(lo, hi)
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.compositor.set_scale_mode(mode);
    }

    /// Switches to a registered theme by name.
    pub fn set_theme(&mut self, name: &str) -> ChartResult<()> {
        let theme = self.themes.get(name)?.clone();
        self.compositor.set_theme(theme)
    }

    /// Adds a theme to this plot's registry.
    pub fn register_theme(&mut self, theme: Theme) -> ChartResult<()> {
        self.themes.register(theme)
    }

    /// Advances to the next registered theme; returns its name.
    pub fn cycle_theme(&mut self) -> ChartResult<String> {
        let current = self.compositor.theme().name.clone();
        let next = self
            .themes
            .next_after(&current)
            .ok_or_else(|| self.themes.unknown_theme(&current))?
            .clone();
        let name = next.name.clone();
        self.compositor.set_theme(next)?;
        Ok(name)
    }

    /// Shows `text` in the status bar until `duration` has passed.
    pub fn set_status(&mut self, text: impl Into<String>, duration: Duration) {
        let expires_at = self.pacer.clock().now() + duration;
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at,
        });
    }

    /// Current status text, empty when none is active.
    #[must_use]
    pub fn status_text(&self) -> &str {
        self.status
            .as_ref()
            .map_or("", |status| status.text.as_str())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_target_fps(&mut self, rate: i64) {
        self.pacer.set_target_rate(rate);
    }

    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.pacer.target_rate()
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.pacer.fps()
    }

    pub fn set_timing_strategy(&mut self, strategy: TimingStrategy) {
        self.pacer.set_strategy(strategy);
    }

    /// Writer handle for the host's mouse callback.
    #[must_use]
    pub fn mouse_sink(&self) -> MouseEventSink {
        self.mouse.sink()
    }

    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    /// Registered series names in draw order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        self.compositor.config()
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.compositor.theme()
    }

    #[must_use]
    pub fn axis(&self) -> &AxisScaler {
        self.compositor.axis()
    }

    #[must_use]
    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        self.pacer.input()
    }

    #[must_use]
    pub fn recorder(&self) -> &VideoRecorder {
        &self.recorder
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&ComposedFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stops any recording and releases the surface. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.recorder.is_recording() {
            if let Err(err) = self.recorder.stop() {
                warn!(error = %err, "failed to finalize recording on close");
            }
        }
        self.pacer.stop();
        debug!("live plot closed");
    }

    /// True when a push arrives sooner than the minimum update interval after
    /// the previous accepted one. Records the push time otherwise.
    fn throttled(&mut self) -> bool {
        let now = self.pacer.clock().now();
        let interval = self.compositor.config().min_update_interval;
        if interval > 0.0 && self.last_frame.is_some() {
            if let Some(last) = self.last_push_at {
                if now.saturating_sub(last).as_secs_f64() < interval {
                    return true;
                }
            }
        }
        self.last_push_at = Some(now);
        false
    }

    fn cached_frame(&self) -> ChartResult<&ComposedFrame> {
        self.last_frame
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("no frame rendered yet".to_owned()))
    }

    fn render_frame(&mut self) -> ChartResult<&ComposedFrame> {
        let now = self.pacer.clock().now();
        if self.status.as_ref().is_some_and(|s| now > s.expires_at) {
            self.status = None;
        }

        let mouse = self
            .mouse
            .position()
            .map(|(x, y)| (f64::from(x), f64::from(y)));
        let status = FrameStatus {
            fps: self.pacer.fps(),
            paused: self.paused,
            mouse,
            status_text: self
                .status
                .as_ref()
                .map_or("", |status| status.text.as_str()),
        };
        let frame = self.compositor.render(&self.series, status)?;
        self.renderer.render(&frame)?;
        Ok(&*self.last_frame.insert(frame))
    }
}

impl<R: Renderer, S: DisplaySurface, C: Clock> Drop for LivePlot<R, S, C> {
    fn drop(&mut self) {
        self.close();
    }
}
