pub mod axis;
pub mod format;
pub mod series_buffer;
pub mod types;

pub use axis::{AxisRange, AxisScaler, AxisTuning, AxisUpdate, MAX_AUTO_BOUND, ScaleMode};
pub use format::{MISSING_PLACEHOLDER, format_axis_value, format_sample};
pub use series_buffer::{MISSING, SeriesBuffer, is_missing, sanitize_sample};
pub use types::{Layout, Margins, Viewport};
