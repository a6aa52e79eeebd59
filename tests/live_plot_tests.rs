use std::time::Duration;

use livechart::api::{DEFAULT_SERIES, LivePlot, PlotConfig, SeriesStyle, ThemeRegistry};
use livechart::capture::{PngSequenceEncoder, VideoEncoder, VideoRecorder};
use livechart::core::{AxisRange, ScaleMode};
use livechart::interaction::KeyCode;
use livechart::pacing::ManualClock;
use livechart::platform::HeadlessSurface;
use livechart::render::{Color, NullRenderer, OverlayLayerKind};
use livechart::ChartError;

type TestPlot = LivePlot<NullRenderer, HeadlessSurface, ManualClock>;

fn plot_with(config: PlotConfig, surface: HeadlessSurface) -> (TestPlot, ManualClock) {
    let clock = ManualClock::new();
    let plot = LivePlot::with_parts(
        config,
        ThemeRegistry::new(),
        NullRenderer::default(),
        surface.without_sleep(),
        clock.clone(),
    )
    .expect("plot");
    (plot, clock)
}

fn plot(config: PlotConfig) -> (TestPlot, ManualClock) {
    plot_with(config, HeadlessSurface::new())
}

fn key(plot: &mut TestPlot, key: char) -> bool {
    plot.handle_key(KeyCode::from(key)).expect("handle key")
}

fn status_bar_text(plot: &TestPlot) -> String {
    plot.last_frame()
        .and_then(|frame| frame.layer(OverlayLayerKind::StatusBar))
        .and_then(|layer| layer.texts.last())
        .map(|text| text.text.clone())
        .unwrap_or_default()
}

#[test]
fn default_series_is_created_on_first_push() {
    let (mut plot, _) = plot(PlotConfig::default());

    plot.push_default(42.0).expect("push");
    plot.push_default(None::<f64>).expect("push missing");

    let series = plot.series(DEFAULT_SERIES).expect("default series");
    assert_eq!(series.label(), "Value");
    assert_eq!(series.buffer().len(), 2);
    assert_eq!(plot.series_names().collect::<Vec<_>>(), [DEFAULT_SERIES]);
    assert_eq!(plot.renderer().frames_rendered, 2);
}

#[test]
fn pushing_to_an_unknown_series_fails_fast() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("cpu", None).expect("add");

    let err = plot.push_named("gpu", 1.0).expect_err("unknown series");
    assert!(matches!(err, ChartError::UnknownSeries(name) if name == "gpu"));

    let err = plot
        .push_many([("cpu", Some(1.0)), ("gpu", Some(2.0))])
        .expect_err("unknown series in batch");
    assert!(matches!(err, ChartError::UnknownSeries(_)));
    assert!(plot.series("cpu").expect("cpu").buffer().is_empty());
    assert_eq!(plot.renderer().frames_rendered, 0);
}

#[test]
fn blank_series_names_are_rejected() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("a", None).expect("add a");

    for name in ["", "   "] {
        let err = plot.add_series(name, None).expect_err("blank name");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }
    assert_eq!(plot.series_names().count(), 1);

    plot.add_series("b", None).expect("add b");
    plot.push_many([("a", Some(1.0)), ("b", Some(2.0))])
        .expect("legend renders");
}

#[test]
fn push_many_renders_once_for_all_series() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("a", None).expect("add a");
    plot.add_series("b", None).expect("add b");

    plot.push_many([("a", Some(1.0)), ("b", Some(2.0))])
        .expect("push many");

    assert_eq!(plot.series("a").expect("a").buffer().latest(), 1.0);
    assert_eq!(plot.series("b").expect("b").buffer().latest(), 2.0);
    assert_eq!(plot.renderer().frames_rendered, 1);
}

#[test]
fn unstyled_series_take_palette_colors_in_order() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("first", None).expect("first");
    plot.add_series("second", None).expect("second");

    let theme = plot.theme().clone();
    assert_eq!(plot.series("first").expect("first").style().color, theme.series_color(0));
    assert_eq!(plot.series("second").expect("second").style().color, theme.series_color(1));
}

#[test]
fn pause_keeps_rendering_but_drops_data() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.push_default(1.0).expect("push");

    assert!(!key(&mut plot, 'p'));
    assert!(plot.is_paused());
    plot.push_default(2.0).expect("paused push");

    let series = plot.series(DEFAULT_SERIES).expect("series");
    assert_eq!(series.buffer().snapshot(), vec![1.0]);
    assert_eq!(plot.renderer().frames_rendered, 2);
    assert!(status_bar_text(&plot).contains("|| PAUSED"));

    key(&mut plot, ' ');
    assert!(!plot.is_paused());
}

#[test]
fn reset_clears_every_series_and_reports_it() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("a", None).expect("add");
    plot.push_named("a", 1.0).expect("push");
    plot.push_default(2.0).expect("push default");

    key(&mut plot, 'r');

    assert!(plot.series("a").expect("a").buffer().is_empty());
    assert!(plot.series(DEFAULT_SERIES).expect("default").buffer().is_empty());
    assert_eq!(plot.status_text(), "Data cleared");
}

#[test]
fn theme_cycling_invalidates_the_background() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.push_default(1.0).expect("push");
    let rebuilds = plot.compositor().rebuild_count();

    key(&mut plot, 't');
    plot.render().expect("render");

    assert_eq!(plot.theme().name, "light");
    assert_eq!(plot.status_text(), "Theme: light");
    assert_eq!(plot.compositor().rebuild_count(), rebuilds + 1);
    assert_eq!(plot.renderer().background_uploads, 2);

    key(&mut plot, 't');
    key(&mut plot, 't');
    assert_eq!(plot.theme().name, "dark");
}

#[test]
fn unknown_theme_is_rejected() {
    let (mut plot, _) = plot(PlotConfig::default());
    assert!(matches!(
        plot.set_theme("neon"),
        Err(ChartError::UnknownTheme { .. })
    ));
    assert_eq!(plot.theme().name, "dark");
}

#[test]
fn keyboard_fps_changes_clamp_at_ten() {
    let (mut plot, _) = plot(PlotConfig::default());

    for _ in 0..8 {
        key(&mut plot, '-');
    }
    assert_eq!(plot.target_fps(), 10);
    assert_eq!(plot.status_text(), "Target FPS: 10");

    key(&mut plot, '+');
    assert_eq!(plot.target_fps(), 20);
}

#[test]
fn programmatic_fps_can_go_unthrottled() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.set_target_fps(0);
    assert_eq!(plot.target_fps(), 0);
    plot.set_target_fps(-20);
    assert_eq!(plot.target_fps(), 0);
}

#[test]
fn pushes_inside_the_minimum_interval_are_dropped() {
    let (mut plot, clock) = plot(PlotConfig::default().with_min_update_interval(0.05));

    plot.push_default(1.0).expect("first");
    plot.push_default(2.0).expect("throttled");
    clock.advance(Duration::from_millis(20));
    plot.push_default(3.0).expect("still throttled");
    clock.advance(Duration::from_millis(40));
    plot.push_default(4.0).expect("accepted");

    let series = plot.series(DEFAULT_SERIES).expect("series");
    assert_eq!(series.buffer().snapshot(), vec![1.0, 4.0]);
    assert_eq!(plot.renderer().frames_rendered, 2);
}

#[test]
fn screenshot_without_raster_backend_reports_in_status_bar() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.push_default(1.0).expect("push");

    assert!(matches!(
        plot.screenshot(),
        Err(ChartError::NoRasterCanvas("null"))
    ));
    key(&mut plot, 's');

    assert!(plot.status_text().starts_with("Screenshot failed:"));
}

#[test]
fn status_message_expires_with_the_clock() {
    let (mut plot, clock) = plot(PlotConfig::default());
    plot.set_status("hello", Duration::from_secs(1));

    plot.render().expect("render");
    assert_eq!(status_bar_text(&plot), "0 FPS | hello");

    clock.advance(Duration::from_secs(2));
    plot.render().expect("render");
    assert_eq!(plot.status_text(), "");
    assert_eq!(status_bar_text(&plot), "0 FPS");
}

#[test]
fn disabled_keyboard_only_honours_quit() {
    let mut config = PlotConfig::default();
    config.enable_keyboard = false;
    let (mut plot, _) = plot(config);

    assert!(!key(&mut plot, 'p'));
    assert!(!plot.is_paused());
    assert!(key(&mut plot, 'q'));
}

#[test]
fn quit_key_from_the_surface_closes_the_plot() {
    let surface = HeadlessSurface::new().with_keys([KeyCode::from('x'), KeyCode::new(27)]);
    let (mut plot, _) = plot_with(PlotConfig::default(), surface);
    plot.push_default(1.0).expect("push");

    assert!(!plot.step().expect("first step"));
    assert!(plot.step().expect("second step"));

    assert!(plot.is_closed());
    assert!(plot.surface().is_released());
    assert_eq!(plot.surface().presented_frames(), 2);
    assert_eq!(plot.surface().last_canvas_size(), None);
}

#[test]
fn step_named_pushes_then_paces() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("x", None).expect("add");

    for i in 0..3 {
        assert!(!plot.step_named("x", f64::from(i)).expect("step"));
    }

    assert_eq!(plot.series("x").expect("x").buffer().len(), 3);
    assert_eq!(plot.surface().presented_frames(), 3);
}

#[test]
fn adding_and_removing_series_invalidates_the_background() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.render().expect("render");
    let rebuilds = plot.compositor().rebuild_count();

    plot.add_series("a", Some(SeriesStyle::new("A", Color::WHITE)))
        .expect("add");
    plot.render().expect("render");
    assert_eq!(plot.compositor().rebuild_count(), rebuilds + 1);

    assert!(plot.remove_series("a"));
    assert!(!plot.remove_series("a"));
    plot.render().expect("render");
    assert_eq!(plot.compositor().rebuild_count(), rebuilds + 2);

    plot.render().expect("render");
    assert_eq!(plot.compositor().rebuild_count(), rebuilds + 2);
}

#[test]
fn clearing_an_unknown_series_is_an_error() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.add_series("a", None).expect("add");
    plot.push_named("a", 5.0).expect("push");

    assert!(matches!(plot.clear("b"), Err(ChartError::UnknownSeries(_))));
    plot.clear("a").expect("clear");
    assert!(plot.series("a").expect("a").buffer().is_empty());
}

#[test]
fn explicit_bounds_and_scale_mode_reach_the_axis() {
    let (mut plot, _) = plot(PlotConfig::default());

    plot.set_bounds(-20.0, 20.0).expect("bounds");
    assert_eq!(plot.axis().displayed(), AxisRange::new(-20.0, 20.0));
    assert!(plot.set_bounds(3.0, 1.0).is_err());

    plot.set_scale_mode(ScaleMode::Auto);
    assert_eq!(plot.axis().mode(), ScaleMode::Auto);
}

#[test]
fn mouse_position_drives_the_crosshair() {
    let (mut plot, _) = plot(PlotConfig::default());
    let sink = plot.mouse_sink();
    plot.push_default(10.0).expect("push");
    plot.push_default(20.0).expect("push");

    sink.on_move(300, 200);
    plot.render().expect("render");
    let crosshair = plot
        .last_frame()
        .and_then(|frame| frame.layer(OverlayLayerKind::Crosshair))
        .expect("crosshair layer");
    assert_eq!(crosshair.lines.len(), 1);

    sink.on_leave();
    plot.render().expect("render");
    let crosshair = plot
        .last_frame()
        .and_then(|frame| frame.layer(OverlayLayerKind::Crosshair))
        .expect("crosshair layer");
    assert!(crosshair.is_empty());
}

#[test]
fn recording_toggle_reports_start_and_stop() {
    let dir = tempfile::tempdir().expect("temp dir");
    let encoders: Vec<Box<dyn VideoEncoder>> = vec![Box::new(PngSequenceEncoder)];
    let recorder = VideoRecorder::with_encoders(800, 480, 30.0, dir.path(), encoders);
    let (plot, _) = plot(PlotConfig::default());
    let mut plot = plot.with_recorder(recorder);

    key(&mut plot, 'v');
    assert!(plot.recorder().is_recording());
    assert_eq!(plot.status_text(), "Recording...");

    // Scene-only renderers have no canvas, so nothing is written.
    assert!(!plot.step().expect("step"));
    assert_eq!(plot.recorder().frames_written(), 0);

    key(&mut plot, 'v');
    assert!(!plot.recorder().is_recording());
    assert!(plot.status_text().starts_with("Recorded: "));
}

#[test]
fn recording_without_encoders_is_a_status_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let recorder = VideoRecorder::with_encoders(800, 480, 30.0, dir.path(), Vec::new());
    let (plot, _) = plot(PlotConfig::default());
    let mut plot = plot.with_recorder(recorder);

    key(&mut plot, 'v');

    assert!(!plot.recorder().is_recording());
    assert!(plot.status_text().starts_with("Record failed:"));
}

#[test]
fn close_is_idempotent() {
    let (mut plot, _) = plot(PlotConfig::default());
    plot.close();
    plot.close();
    assert!(plot.is_closed());
    assert!(plot.surface().is_released());
}
