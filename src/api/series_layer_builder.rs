use crate::core::is_missing;
use crate::render::{CirclePrimitive, Color, PolylinePrimitive, RenderFrame};

use super::SeriesRegistry;
use super::compositor::SceneContext;

const GLOW_EXTRA_RADIUS: f64 = 6.0;
const GLOW_DIM_DIVISOR: f64 = 3.0;
const DOT_CENTER_RADIUS: f64 = 2.0;

/// Appends one polyline per contiguous run of valid samples, plus the marker
/// dot on the newest sample, for every series in registration order.
pub(super) fn append_series(
    frame: &mut RenderFrame,
    ctx: &SceneContext<'_>,
    series: &SeriesRegistry,
) {
    let layout = ctx.layout;

    for entry in series.values() {
        let buffer = entry.buffer();
        let count = buffer.len();
        if count < 2 {
            continue;
        }
        let style = entry.style();
        let step = layout.width / (count - 1) as f64;

        let mut run: Vec<(f64, f64)> = Vec::new();
        let mut newest_point = None;
        for (index, value) in buffer.iter().enumerate() {
            if is_missing(value) {
                flush_run(frame, &mut run, style.line_width, style.color);
                newest_point = None;
                continue;
            }
            let point = (layout.x + index as f64 * step, ctx.value_to_y(value));
            run.push(point);
            newest_point = Some(point);
        }
        flush_run(frame, &mut run, style.line_width, style.color);

        if !style.show_dot {
            continue;
        }
        let Some((x, y)) = newest_point else {
            continue;
        };
        if style.show_glow {
            frame.circles.push(CirclePrimitive::new(
                x,
                y,
                style.dot_radius + GLOW_EXTRA_RADIUS,
                style.color.dimmed(GLOW_DIM_DIVISOR),
            ));
        }
        frame
            .circles
            .push(CirclePrimitive::new(x, y, style.dot_radius, style.color));
        frame
            .circles
            .push(CirclePrimitive::new(x, y, DOT_CENTER_RADIUS, Color::WHITE));
    }
}

fn flush_run(frame: &mut RenderFrame, run: &mut Vec<(f64, f64)>, width: f64, color: Color) {
    if run.len() >= 2 {
        frame
            .polylines
            .push(PolylinePrimitive::new(std::mem::take(run), width, color));
    } else {
        run.clear();
    }
}
