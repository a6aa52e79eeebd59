use std::sync::Arc;

use crate::error::ChartResult;
use crate::render::{ComposedFrame, RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates every frame so invalid geometry surfaces without a
/// raster backend, and it mimics a raster backend's background reuse by
/// counting how often a new background scene arrives.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub background_uploads: usize,
    pub last_primitive_count: usize,
    pub last_polyline_count: usize,
    pub last_circle_count: usize,
    pub last_text_count: usize,
    last_background: Option<Arc<RenderFrame>>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &ComposedFrame) -> ChartResult<()> {
        frame.validate()?;

        let reused = self
            .last_background
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, &frame.background));
        if !reused {
            self.background_uploads += 1;
            self.last_background = Some(Arc::clone(&frame.background));
        }

        let overlay = frame.overlay();
        self.frames_rendered += 1;
        self.last_primitive_count = frame.background.primitive_count() + overlay.primitive_count();
        self.last_polyline_count = overlay.polylines.len();
        self.last_circle_count = overlay.circles.len();
        self.last_text_count = frame.background.texts.len() + overlay.texts.len();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}
