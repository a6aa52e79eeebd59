mod composed_frame;
mod frame;
mod null_renderer;
mod primitives;
mod text_metrics;

pub use composed_frame::{ComposedFrame, OverlayLayer, OverlayLayerKind};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use text_metrics::estimate_text_width_px;

use image::RgbImage;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `ComposedFrame` so
/// drawing code stays isolated from series, axis and pacing logic.
pub trait Renderer {
    fn render(&mut self, frame: &ComposedFrame) -> ChartResult<()>;

    /// Short backend identifier used in logs and errors.
    fn backend_name(&self) -> &'static str;

    /// Last rasterized canvas (3-channel, 8-bit) for backends that produce
    /// pixels. Scene-only backends return `None`.
    fn canvas(&self) -> Option<&RgbImage> {
        None
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
