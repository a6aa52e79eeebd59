mod background_builder;
mod compositor;
mod config;
mod live_plot;
mod overlay_builder;
mod series;
mod series_layer_builder;
mod theme;

pub use compositor::{FrameCompositor, FrameStatus};
pub use config::{PlotConfig, SeriesStyle};
pub use live_plot::{DEFAULT_SERIES, LivePlot, MIN_KEYBOARD_FPS};
pub use series::{Series, SeriesRegistry};
pub use theme::{Theme, ThemeRegistry};
