//! Host window boundary: the display surface trait, a headless surface, and
//! best-effort OS tuning hooks.

mod fixes;
mod headless;

pub use fixes::{
    NoopPlatformHooks, PlatformFixReport, PlatformHooks, PlatformInfo, apply_platform_fixes,
    cleanup_platform,
};
pub use headless::HeadlessSurface;

use image::RgbImage;

use crate::error::ChartResult;
use crate::interaction::InputSource;
use crate::render::ComposedFrame;

/// Window the chart presents into.
///
/// A surface is also the input pump: the pacer waits through
/// [`InputSource::poll_key`], which lets the host process its event queue.
/// `canvas` carries the rasterized pixels when the renderer produces them.
pub trait DisplaySurface: InputSource {
    fn present(&mut self, frame: &ComposedFrame, canvas: Option<&RgbImage>) -> ChartResult<()>;
}
