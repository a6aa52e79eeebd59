use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::error::ChartResult;

use super::capture_timestamp;

/// Writes `canvas` as `liveplot_<YYYYmmdd_HHMMSS_mmm>.png` inside `dir`,
/// creating the directory when needed. Returns the written path.
pub fn save_screenshot(canvas: &RgbImage, dir: impl AsRef<Path>) -> ChartResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("liveplot_{}.png", capture_timestamp(true)));
    canvas.save_with_format(&path, ImageFormat::Png)?;
    debug!(path = %path.display(), width = canvas.width(), height = canvas.height(), "screenshot saved");
    Ok(path)
}
