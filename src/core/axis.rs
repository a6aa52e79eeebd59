use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::SeriesBuffer;
use crate::error::{ChartError, ChartResult};

/// Floor applied to the data span so constant signals still get a range.
pub const MIN_DATA_SPAN: f64 = 0.000_001;

/// Fraction of one pixel a smoothed bound must move before the background
/// is considered stale.
pub const VISIBLE_DRIFT_PX: f64 = 0.1;

/// Largest magnitude an automatic bound may take. Keeps `hi - lo` and every
/// interpolation step finite even for samples near `f64::MAX`.
pub const MAX_AUTO_BOUND: f64 = f64::MAX / 4.0;

/// Y-axis scaling behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    /// Keep the configured bounds.
    #[default]
    Fixed,
    /// Fit the data every frame; the range grows and shrinks.
    Auto,
    /// Fit the data every frame but never shrink the range.
    AutoExpand,
}

/// Closed value interval of the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub lo: f64,
    pub hi: f64,
}

impl AxisRange {
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Width used for mapping; a zero-width range counts as one unit.
    #[must_use]
    pub fn effective_span(self) -> f64 {
        let span = self.hi - self.lo;
        if span == 0.0 { 1.0 } else { span }
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        ((value - self.lo) / self.effective_span()).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn contains_strictly(self, value: f64) -> bool {
        self.lo < value && value < self.hi
    }
}

/// Tuning knobs for automatic scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    /// Symmetric padding as a fraction of the data span.
    pub padding_ratio: f64,
    /// Interpolate displayed bounds toward the target instead of snapping.
    pub smoothing: bool,
    /// Interpolation factor per frame, in `(0, 1]`.
    pub smoothing_speed: f64,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            padding_ratio: 0.1,
            smoothing: true,
            smoothing_speed: 0.15,
        }
    }
}

impl AxisTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.padding_ratio.is_finite() || self.padding_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "axis padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.smoothing_speed.is_finite()
            || self.smoothing_speed <= 0.0
            || self.smoothing_speed > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "axis smoothing speed must be in (0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Outcome of one scaling pass, consumed by the render cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisUpdate {
    pub dirty: bool,
}

/// Y-axis state machine: configured, target and displayed bounds.
///
/// `target` is the instantaneously correct range; `displayed` is what gets
/// drawn and lags `target` while smoothing is enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScaler {
    mode: ScaleMode,
    tuning: AxisTuning,
    configured: AxisRange,
    target: AxisRange,
    displayed: AxisRange,
}

impl AxisScaler {
    pub fn new(lo: f64, hi: f64, mode: ScaleMode, tuning: AxisTuning) -> ChartResult<Self> {
        let range = validate_bounds(lo, hi)?;
        let tuning = tuning.validate()?;
        Ok(Self {
            mode,
            tuning,
            configured: range,
            target: range,
            displayed: range,
        })
    }

    #[must_use]
    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    /// Switches mode at runtime without resetting target state.
    pub fn set_mode(&mut self, mode: ScaleMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn tuning(&self) -> AxisTuning {
        self.tuning
    }

    pub fn set_tuning(&mut self, tuning: AxisTuning) -> ChartResult<()> {
        self.tuning = tuning.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn configured(&self) -> AxisRange {
        self.configured
    }

    #[must_use]
    pub fn target(&self) -> AxisRange {
        self.target
    }

    #[must_use]
    pub fn displayed(&self) -> AxisRange {
        self.displayed
    }

    /// Explicit override: target and displayed jump to `(lo, hi)`.
    ///
    /// The returned update is always dirty. Auto modes continue from this
    /// range on their next pass.
    pub fn set_bounds(&mut self, lo: f64, hi: f64) -> ChartResult<AxisUpdate> {
        let range = validate_bounds(lo, hi)?;
        self.configured = range;
        self.target = range;
        self.displayed = range;
        Ok(AxisUpdate { dirty: true })
    }

    /// Per-frame scaling pass.
    ///
    /// `plot_height_px` sizes the visibility threshold used while smoothing.
    pub fn update<'a, I>(&mut self, buffers: I, plot_height_px: f64) -> AxisUpdate
    where
        I: IntoIterator<Item = &'a SeriesBuffer>,
    {
        if self.mode == ScaleMode::Fixed {
            return self.hold_configured();
        }

        if let Some(candidate) = self.fit_candidate(buffers) {
            self.target = match self.mode {
                ScaleMode::AutoExpand => AxisRange::new(
                    candidate.lo.min(self.target.lo),
                    candidate.hi.max(self.target.hi),
                ),
                _ => candidate,
            };
        }

        if self.tuning.smoothing {
            self.interpolate(plot_height_px)
        } else {
            self.snap()
        }
    }

    fn fit_candidate<'a, I>(&self, buffers: I) -> Option<AxisRange>
    where
        I: IntoIterator<Item = &'a SeriesBuffer>,
    {
        let (data_min, data_max) = buffers
            .into_iter()
            .filter_map(SeriesBuffer::min_max)
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))?;

        let span = (data_max - data_min).max(MIN_DATA_SPAN);
        let pad = span * self.tuning.padding_ratio;
        // Overflowed spans saturate to infinities, which the clamp absorbs.
        Some(AxisRange::new(
            (data_min - pad).clamp(-MAX_AUTO_BOUND, MAX_AUTO_BOUND),
            (data_max + pad).clamp(-MAX_AUTO_BOUND, MAX_AUTO_BOUND),
        ))
    }

    fn hold_configured(&mut self) -> AxisUpdate {
        let dirty = self.displayed != self.configured;
        self.target = self.configured;
        self.displayed = self.configured;
        AxisUpdate { dirty }
    }

    fn snap(&mut self) -> AxisUpdate {
        let dirty = self.displayed != self.target;
        self.displayed = self.target;
        AxisUpdate { dirty }
    }

    fn interpolate(&mut self, plot_height_px: f64) -> AxisUpdate {
        let alpha = self.tuning.smoothing_speed;
        let previous = self.displayed;

        self.displayed.lo += (self.target.lo - self.displayed.lo) * alpha;
        self.displayed.hi += (self.target.hi - self.displayed.hi) * alpha;

        let threshold =
            self.displayed.effective_span().abs() / plot_height_px.max(1.0) * VISIBLE_DRIFT_PX;
        let dirty = (self.displayed.lo - previous.lo).abs() > threshold
            || (self.displayed.hi - previous.hi).abs() > threshold;
        if dirty {
            trace!(
                lo = self.displayed.lo,
                hi = self.displayed.hi,
                "axis drift crossed visibility threshold"
            );
        }
        AxisUpdate { dirty }
    }
}

fn validate_bounds(lo: f64, hi: f64) -> ChartResult<AxisRange> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(ChartError::InvalidData(
            "axis bounds must be finite".to_owned(),
        ));
    }
    if lo > hi {
        return Err(ChartError::InvalidData(format!(
            "axis lower bound {lo} exceeds upper bound {hi}"
        )));
    }
    if !(hi - lo).is_finite() {
        return Err(ChartError::InvalidData(format!(
            "axis span between {lo} and {hi} overflows"
        )));
    }
    Ok(AxisRange::new(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::{AxisRange, AxisScaler, AxisTuning, ScaleMode};

    #[test]
    fn degenerate_range_maps_with_unit_span() {
        let range = AxisRange::new(5.0, 5.0);
        assert_eq!(range.effective_span(), 1.0);
        assert_eq!(range.normalize(5.5), 0.5);
        assert_eq!(range.normalize(100.0), 1.0);
    }

    #[test]
    fn inverted_or_non_finite_bounds_are_rejected() {
        let tuning = AxisTuning::default();
        assert!(AxisScaler::new(1.0, 0.0, ScaleMode::Fixed, tuning).is_err());
        assert!(AxisScaler::new(f64::NAN, 1.0, ScaleMode::Fixed, tuning).is_err());
        assert!(AxisScaler::new(2.0, 2.0, ScaleMode::Fixed, tuning).is_ok());
        assert!(AxisScaler::new(-1e308, 1e308, ScaleMode::Fixed, tuning).is_err());
    }

    #[test]
    fn smoothing_speed_outside_unit_interval_is_rejected() {
        let tuning = AxisTuning {
            smoothing_speed: 0.0,
            ..AxisTuning::default()
        };
        assert!(tuning.validate().is_err());
        let tuning = AxisTuning {
            smoothing_speed: 1.5,
            ..AxisTuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn switching_back_to_fixed_restores_configured_bounds() {
        let tuning = AxisTuning {
            smoothing: false,
            ..AxisTuning::default()
        };
        let mut scaler = AxisScaler::new(0.0, 10.0, ScaleMode::Auto, tuning).expect("scaler");
        let mut buffer = crate::core::SeriesBuffer::new(4).expect("buffer");
        buffer.push_value(50.0);
        buffer.push_value(60.0);
        assert!(scaler.update([&buffer], 100.0).dirty);

        scaler.set_mode(ScaleMode::Fixed);
        assert!(scaler.update([&buffer], 100.0).dirty);
        assert_eq!(scaler.displayed(), AxisRange::new(0.0, 10.0));
        assert!(!scaler.update([&buffer], 100.0).dirty);
    }
}
