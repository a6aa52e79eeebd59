use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

const OUTSIDE: u64 = u64::MAX;

fn pack(x: i32, y: i32) -> u64 {
    (u64::from(y as u32) << 32) | u64::from(x as u32)
}

fn unpack(packed: u64) -> Option<(i32, i32)> {
    if packed == OUTSIDE {
        return None;
    }
    Some(((packed & 0xffff_ffff) as u32 as i32, (packed >> 32) as u32 as i32))
}

/// Last known pointer position inside the host window.
///
/// The host's mouse callback may run on another thread; it writes through a
/// [`MouseEventSink`] while the render loop reads here. Both sides share one
/// atomic word, so neither ever blocks. The position `(-1, -1)` is reserved
/// for "outside".
#[derive(Debug, Clone)]
pub struct MouseTracker {
    cell: Arc<AtomicU64>,
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self {
            cell: Arc::new(AtomicU64::new(OUTSIDE)),
        }
    }
}

impl MouseTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer handle for the host callback.
    #[must_use]
    pub fn sink(&self) -> MouseEventSink {
        MouseEventSink {
            cell: Arc::clone(&self.cell),
        }
    }

    /// Current position, or `None` after the pointer left the window.
    #[must_use]
    pub fn position(&self) -> Option<(i32, i32)> {
        unpack(self.cell.load(Ordering::Acquire))
    }
}

/// Write side of [`MouseTracker`].
#[derive(Debug, Clone)]
pub struct MouseEventSink {
    cell: Arc<AtomicU64>,
}

impl MouseEventSink {
    pub fn on_move(&self, x: i32, y: i32) {
        trace!(x, y, "pointer moved");
        self.cell.store(pack(x, y), Ordering::Release);
    }

    pub fn on_leave(&self) {
        trace!("pointer left window");
        self.cell.store(OUTSIDE, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::{pack, unpack};

    #[test]
    fn negative_coordinates_survive_packing() {
        assert_eq!(unpack(pack(-5, 12)), Some((-5, 12)));
        assert_eq!(unpack(pack(640, -3)), Some((640, -3)));
    }
}
