use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::ChartResult;

use super::RenderFrame;

/// Per-frame overlay layers, listed in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayLayerKind {
    Series,
    Legend,
    Values,
    Crosshair,
    StatusBar,
}

impl OverlayLayerKind {
    pub const PAINT_ORDER: [Self; 5] = [
        Self::Series,
        Self::Legend,
        Self::Values,
        Self::Crosshair,
        Self::StatusBar,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub kind: OverlayLayerKind,
    pub frame: RenderFrame,
}

/// One finished chart frame: the cached static background plus the overlay
/// layers drawn on top of it.
///
/// The background is shared with the compositor's cache; two frames built
/// without an intervening invalidation hold the same allocation, which
/// backends use to skip re-rasterizing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedFrame {
    pub viewport: Viewport,
    pub background: Arc<RenderFrame>,
    pub layers: Vec<OverlayLayer>,
}

impl ComposedFrame {
    #[must_use]
    pub fn new(viewport: Viewport, background: Arc<RenderFrame>) -> Self {
        let layers = OverlayLayerKind::PAINT_ORDER
            .into_iter()
            .map(|kind| OverlayLayer {
                kind,
                frame: RenderFrame::new(viewport),
            })
            .collect();
        Self {
            viewport,
            background,
            layers,
        }
    }

    #[must_use]
    pub fn layer(&self, kind: OverlayLayerKind) -> Option<&RenderFrame> {
        self.layers
            .iter()
            .find(|layer| layer.kind == kind)
            .map(|layer| &layer.frame)
    }

    pub fn layer_mut(&mut self, kind: OverlayLayerKind) -> Option<&mut RenderFrame> {
        self.layers
            .iter_mut()
            .find(|layer| layer.kind == kind)
            .map(|layer| &mut layer.frame)
    }

    /// Whether `self` reuses exactly the same cached background as `other`.
    #[must_use]
    pub fn shares_background_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.background, &other.background)
    }

    /// Flattens the overlay layers (background excluded) into one scene.
    #[must_use]
    pub fn overlay(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            frame.extend_from(&layer.frame);
        }
        frame
    }

    /// Background followed by every overlay layer, as one scene.
    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = (*self.background).clone();
        for layer in &self.layers {
            frame.extend_from(&layer.frame);
        }
        frame
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.background.validate()?;
        for layer in &self.layers {
            layer.frame.validate()?;
        }
        Ok(())
    }
}
