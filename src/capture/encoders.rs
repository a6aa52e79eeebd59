use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// Factory for one way of turning frames into a recording.
///
/// `open` fails when the encoder is unavailable on this host; the recorder
/// then moves on to the next candidate.
pub trait VideoEncoder: fmt::Debug {
    fn name(&self) -> &str;

    /// Starts a session writing next to `base` (a path without extension).
    fn open(&self, base: &Path, width: u32, height: u32, fps: f64) -> ChartResult<Box<dyn VideoSink>>;
}

/// One running recording session.
pub trait VideoSink: fmt::Debug {
    fn write_frame(&mut self, frame: &RgbImage) -> ChartResult<()>;

    /// Flushes and closes the output. Called exactly once.
    fn finish(&mut self) -> ChartResult<()>;

    fn output_path(&self) -> &Path;
}

fn check_frame_size(frame: &RgbImage, width: u32, height: u32) -> ChartResult<()> {
    if frame.dimensions() != (width, height) {
        return Err(ChartError::InvalidData(format!(
            "video frame is {}x{}, recorder expects {width}x{height}",
            frame.width(),
            frame.height()
        )));
    }
    Ok(())
}

/// MPEG-4 (`mp4v`) encoding through an external `ffmpeg` process fed raw
/// RGB24 frames on stdin.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific ffmpeg binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg (mp4v)"
    }

    fn open(&self, base: &Path, width: u32, height: u32, fps: f64) -> ChartResult<Box<dyn VideoSink>> {
        let path = base.with_extension("mp4");
        let mut child = Command::new(&self.program)
            .args(["-loglevel", "error", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{width}x{height}")])
            .args(["-r", &format!("{fps}")])
            .args(["-i", "-", "-c:v", "mpeg4", "-vtag", "mp4v", "-pix_fmt", "yuv420p"])
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            return Err(ChartError::InvalidData(
                "ffmpeg started without a stdin pipe".to_owned(),
            ));
        };
        debug!(program = %self.program.display(), path = %path.display(), "ffmpeg session started");
        Ok(Box::new(FfmpegSink {
            child,
            stdin: Some(stdin),
            path,
            width,
            height,
        }))
    }
}

#[derive(Debug)]
struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    width: u32,
    height: u32,
}

impl VideoSink for FfmpegSink {
    fn write_frame(&mut self, frame: &RgbImage) -> ChartResult<()> {
        check_frame_size(frame, self.width, self.height)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ChartError::InvalidData(
                "ffmpeg session already finished".to_owned(),
            ));
        };
        stdin.write_all(frame.as_raw())?;
        Ok(())
    }

    fn finish(&mut self) -> ChartResult<()> {
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            return Err(ChartError::InvalidData(format!(
                "ffmpeg exited with {status} while writing {}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn output_path(&self) -> &Path {
        &self.path
    }
}

/// Dependency-free fallback: one numbered PNG per frame in a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngSequenceEncoder;

impl VideoEncoder for PngSequenceEncoder {
    fn name(&self) -> &str {
        "png-sequence"
    }

    fn open(&self, base: &Path, width: u32, height: u32, _fps: f64) -> ChartResult<Box<dyn VideoSink>> {
        let mut dir = base.as_os_str().to_owned();
        dir.push("_frames");
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir)?;
        Ok(Box::new(PngSequenceSink {
            dir,
            width,
            height,
            next_index: 0,
        }))
    }
}

#[derive(Debug)]
struct PngSequenceSink {
    dir: PathBuf,
    width: u32,
    height: u32,
    next_index: u64,
}

impl VideoSink for PngSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> ChartResult<()> {
        check_frame_size(frame, self.width, self.height)?;
        let path = self.dir.join(format!("frame_{:06}.png", self.next_index));
        frame.save_with_format(path, ImageFormat::Png)?;
        self.next_index += 1;
        Ok(())
    }

    fn finish(&mut self) -> ChartResult<()> {
        Ok(())
    }

    fn output_path(&self) -> &Path {
        &self.dir
    }
}
