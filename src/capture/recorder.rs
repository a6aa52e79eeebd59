use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::error::{ChartError, ChartResult};

use super::capture_timestamp;
use super::encoders::{FfmpegEncoder, PngSequenceEncoder, VideoEncoder, VideoSink};

/// Records canvases into a video file.
///
/// `start` walks the encoder list in order and keeps the first one that
/// opens; it only fails when every candidate is unavailable. Frames written
/// while not recording are ignored.
#[derive(Debug)]
pub struct VideoRecorder {
    width: u32,
    height: u32,
    fps: f64,
    directory: PathBuf,
    encoders: Vec<Box<dyn VideoEncoder>>,
    session: Option<Box<dyn VideoSink>>,
    last_output: Option<PathBuf>,
    frames_written: u64,
}

impl VideoRecorder {
    /// Recorder trying ffmpeg first, then a PNG sequence.
    #[must_use]
    pub fn new(width: u32, height: u32, fps: f64, directory: impl Into<PathBuf>) -> Self {
        let encoders: Vec<Box<dyn VideoEncoder>> =
            vec![Box::new(FfmpegEncoder::new()), Box::new(PngSequenceEncoder)];
        Self::with_encoders(width, height, fps, directory, encoders)
    }

    #[must_use]
    pub fn with_encoders(
        width: u32,
        height: u32,
        fps: f64,
        directory: impl Into<PathBuf>,
        encoders: Vec<Box<dyn VideoEncoder>>,
    ) -> Self {
        Self {
            width,
            height,
            fps,
            directory: directory.into(),
            encoders,
            session: None,
            last_output: None,
            frames_written: 0,
        }
    }

    /// Opens a new recording and returns its output path. Calling it while
    /// already recording returns the current path.
    pub fn start(&mut self) -> ChartResult<PathBuf> {
        if let Some(session) = &self.session {
            return Ok(session.output_path().to_path_buf());
        }
        fs::create_dir_all(&self.directory)?;
        let base = self
            .directory
            .join(format!("liveplot_{}", capture_timestamp(false)));

        let mut tried = Vec::with_capacity(self.encoders.len());
        for encoder in &self.encoders {
            match encoder.open(&base, self.width, self.height, self.fps) {
                Ok(session) => {
                    let path = session.output_path().to_path_buf();
                    info!(encoder = encoder.name(), path = %path.display(), "recording started");
                    self.session = Some(session);
                    self.last_output = Some(path.clone());
                    self.frames_written = 0;
                    return Ok(path);
                }
                Err(err) => {
                    warn!(encoder = encoder.name(), error = %err, "video encoder unavailable");
                    tried.push(encoder.name().to_owned());
                }
            }
        }
        Err(ChartError::NoVideoEncoder { tried })
    }

    /// Appends one frame; a no-op while not recording.
    pub fn write_frame(&mut self, frame: &RgbImage) -> ChartResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.write_frame(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Closes the current recording. Returns the path of the most recent
    /// recording, if any was ever started.
    pub fn stop(&mut self) -> ChartResult<Option<PathBuf>> {
        if let Some(mut session) = self.session.take() {
            session.finish()?;
            debug!(frames = self.frames_written, path = %session.output_path().display(), "recording stopped");
        }
        Ok(self.last_output.clone())
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.last_output.as_deref()
    }

    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Drop for VideoRecorder {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(err) = session.finish() {
                warn!(error = %err, "failed to finalize recording on drop");
            }
        }
    }
}
