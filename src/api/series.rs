use indexmap::IndexMap;

use crate::core::SeriesBuffer;
use crate::error::ChartResult;

use super::SeriesStyle;

/// Registration-ordered series table; iteration order is draw order.
pub type SeriesRegistry = IndexMap<String, Series>;

/// One named data line: its style plus its bounded history.
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    style: SeriesStyle,
    buffer: SeriesBuffer,
}

impl Series {
    pub fn new(name: impl Into<String>, style: SeriesStyle, capacity: usize) -> ChartResult<Self> {
        style.validate()?;
        Ok(Self {
            name: name.into(),
            style,
            buffer: SeriesBuffer::new(capacity)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label; falls back to the registry name when the style has none.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.style.label.is_empty() {
            &self.name
        } else {
            &self.style.label
        }
    }

    #[must_use]
    pub fn style(&self) -> &SeriesStyle {
        &self.style
    }

    #[must_use]
    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut SeriesBuffer {
        &mut self.buffer
    }
}
