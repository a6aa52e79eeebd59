//! livechart: bounded-memory real-time line charts.
//!
//! Samples land in fixed-capacity ring buffers, a Y-axis scaler fits (and
//! optionally eases toward) the visible data, and a compositor turns each
//! update into a deterministic primitive scene whose static background is
//! cached until something visible changes. A frame pacer holds the loop to a
//! target rate while pumping host input.
//!
//! Rendering backends and host windows plug in through the
//! [`render::Renderer`] and [`platform::DisplaySurface`] traits.

pub mod api;
pub mod capture;
pub mod core;
pub mod error;
pub mod interaction;
pub mod pacing;
pub mod platform;
pub mod render;
pub mod telemetry;

pub use api::{FrameCompositor, LivePlot, PlotConfig, SeriesStyle, Theme, ThemeRegistry};
pub use error::{ChartError, ChartResult};
