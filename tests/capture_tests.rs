use std::path::Path;

use image::{Rgb, RgbImage};
use livechart::ChartError;
use livechart::capture::{
    FfmpegEncoder, PngSequenceEncoder, VideoEncoder, VideoRecorder, VideoSink, save_screenshot,
};
use livechart::error::ChartResult;

fn canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 40]))
}

fn missing_ffmpeg() -> Box<dyn VideoEncoder> {
    Box::new(FfmpegEncoder::with_program("/nonexistent/bin/ffmpeg"))
}

fn png_sequence() -> Box<dyn VideoEncoder> {
    Box::new(PngSequenceEncoder)
}

#[test]
fn screenshot_creates_directory_and_decodable_png() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = dir.path().join("shots").join("nested");

    let path = save_screenshot(&canvas(32, 16), &target).expect("screenshot");

    assert!(path.starts_with(&target));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("file name");
    assert!(name.starts_with("liveplot_"));
    assert!(name.ends_with(".png"));

    let decoded = image::open(&path).expect("decode png").to_rgb8();
    assert_eq!(decoded.dimensions(), (32, 16));
    assert_eq!(decoded.get_pixel(5, 7), &Rgb([5, 7, 40]));
}

#[test]
fn recorder_falls_back_to_png_sequence() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut recorder = VideoRecorder::with_encoders(
        8,
        6,
        30.0,
        dir.path(),
        vec![missing_ffmpeg(), png_sequence()],
    );

    let output = recorder.start().expect("fallback encoder");
    assert!(recorder.is_recording());
    assert!(output.to_string_lossy().ends_with("_frames"));

    recorder.write_frame(&canvas(8, 6)).expect("frame 0");
    recorder.write_frame(&canvas(8, 6)).expect("frame 1");
    assert_eq!(recorder.frames_written(), 2);

    let stopped = recorder.stop().expect("stop");
    assert_eq!(stopped.as_deref(), Some(output.as_path()));
    assert!(!recorder.is_recording());
    assert!(output.join("frame_000000.png").is_file());
    assert!(output.join("frame_000001.png").is_file());
}

#[test]
fn recorder_reports_every_unavailable_encoder() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut recorder =
        VideoRecorder::with_encoders(8, 6, 30.0, dir.path(), vec![missing_ffmpeg()]);

    let err = recorder.start().expect_err("no encoder available");

    match err {
        ChartError::NoVideoEncoder { tried } => assert_eq!(tried, ["ffmpeg (mp4v)"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!recorder.is_recording());
    assert_eq!(recorder.stop().expect("stop"), None);
}

#[test]
fn frames_outside_a_recording_are_ignored() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut recorder = VideoRecorder::with_encoders(
        8,
        6,
        30.0,
        dir.path(),
        vec![png_sequence()],
    );

    recorder.write_frame(&canvas(8, 6)).expect("idle write");

    assert_eq!(recorder.frames_written(), 0);
    assert_eq!(recorder.output_path(), None);
}

#[test]
fn mismatched_frame_size_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut recorder = VideoRecorder::with_encoders(
        8,
        6,
        30.0,
        dir.path(),
        vec![png_sequence()],
    );
    recorder.start().expect("start");

    let err = recorder
        .write_frame(&canvas(4, 4))
        .expect_err("size mismatch");

    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(recorder.frames_written(), 0);
}

#[derive(Debug)]
struct CountingEncoder;

#[derive(Debug)]
struct CountingSink {
    path: std::path::PathBuf,
}

impl VideoEncoder for CountingEncoder {
    fn name(&self) -> &str {
        "counting"
    }

    fn open(
        &self,
        base: &Path,
        _width: u32,
        _height: u32,
        _fps: f64,
    ) -> ChartResult<Box<dyn VideoSink>> {
        Ok(Box::new(CountingSink {
            path: base.with_extension("count"),
        }))
    }
}

impl VideoSink for CountingSink {
    fn write_frame(&mut self, _frame: &RgbImage) -> ChartResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> ChartResult<()> {
        Ok(())
    }

    fn output_path(&self) -> &Path {
        &self.path
    }
}

#[test]
fn first_available_encoder_wins_and_start_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut recorder = VideoRecorder::with_encoders(
        8,
        6,
        30.0,
        dir.path(),
        vec![
            missing_ffmpeg(),
            Box::new(CountingEncoder) as Box<dyn VideoEncoder>,
            png_sequence(),
        ],
    );

    let first = recorder.start().expect("start");
    let again = recorder.start().expect("start again");

    assert_eq!(first, again);
    assert_eq!(first.extension().and_then(|ext| ext.to_str()), Some("count"));
}
