//! Canvas capture: timestamped PNG screenshots and video recording.

mod encoders;
mod recorder;
mod screenshot;

pub use encoders::{FfmpegEncoder, PngSequenceEncoder, VideoEncoder, VideoSink};
pub use recorder::VideoRecorder;
pub use screenshot::save_screenshot;

use chrono::Local;

/// Local-time stamp used in capture file names.
pub(crate) fn capture_timestamp(with_millis: bool) -> String {
    let format = if with_millis {
        "%Y%m%d_%H%M%S_%3f"
    } else {
        "%Y%m%d_%H%M%S"
    };
    Local::now().format(format).to_string()
}
