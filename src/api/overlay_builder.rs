use smallvec::SmallVec;

use crate::core::{format_axis_value, format_sample, is_missing};
use crate::render::{
    CirclePrimitive, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    estimate_text_width_px,
};

use super::SeriesRegistry;
use super::compositor::{FrameStatus, SceneContext};

pub(super) const SHORTCUTS_HINT: &str = "[S]ave [P]ause [R]eset [Q]uit";

const LEGEND_FONT_PX: f64 = 12.0;
const LEGEND_INSET: f64 = 10.0;
const LEGEND_ROW_HEIGHT: f64 = 20.0;
const LEGEND_EXTRA_WIDTH: f64 = 35.0;

const VALUE_FONT_PX: f64 = 13.0;
const VALUE_RIGHT_INSET: f64 = 10.0;
const VALUE_FIRST_BASELINE_GAP: f64 = 8.0;
const VALUE_ROW_HEIGHT: f64 = 18.0;
const VALUE_MIN_BASELINE: f64 = 10.0;

const TOOLTIP_FONT_PX: f64 = 11.0;
const TOOLTIP_DOT_RADIUS: f64 = 4.0;
const TOOLTIP_OFFSET_X: f64 = 10.0;
const TOOLTIP_WIDTH: f64 = 150.0;
const TOOLTIP_FIRST_BASELINE_GAP: f64 = 20.0;
const TOOLTIP_ROW_HEIGHT: f64 = 16.0;

const STATUS_FONT_PX: f64 = 11.0;
const HINT_FONT_PX: f64 = 10.0;
const STATUS_BASELINE_FROM_BOTTOM: f64 = 12.0;
const HINT_X: f64 = 8.0;
const STATUS_RIGHT_INSET: f64 = 10.0;

/// Legend box with one swatch and label per series; only drawn for two or
/// more series.
pub(super) fn append_legend(
    frame: &mut RenderFrame,
    ctx: &SceneContext<'_>,
    series: &SeriesRegistry,
) {
    if !ctx.config.show_legend || series.len() <= 1 {
        return;
    }
    let theme = ctx.theme;
    let x = ctx.layout.x + LEGEND_INSET;
    let y = ctx.layout.y + LEGEND_INSET;

    let widest_label = series
        .values()
        .map(|entry| estimate_text_width_px(entry.label(), LEGEND_FONT_PX))
        .fold(0.0, f64::max);
    let width = widest_label.ceil() + LEGEND_EXTRA_WIDTH;
    let height = series.len() as f64 * LEGEND_ROW_HEIGHT + 10.0;

    frame.rects.push(
        RectPrimitive::filled(
            x,
            y,
            width,
            height,
            theme.legend_background.with_alpha(theme.legend_alpha),
        )
        .with_border(theme.border, 1.0),
    );

    for (row, entry) in series.values().enumerate() {
        let baseline = y + 15.0 + row as f64 * LEGEND_ROW_HEIGHT;
        frame.lines.push(LinePrimitive::new(
            x + 8.0,
            baseline - 3.0,
            x + 22.0,
            baseline - 3.0,
            2.0,
            entry.style().color,
        ));
        frame.texts.push(TextPrimitive::new(
            entry.label(),
            x + 28.0,
            baseline,
            LEGEND_FONT_PX,
            theme.axis_label,
            TextHAlign::Left,
        ));
    }
}

/// Latest-value readouts stacked upward above the plot's top-right corner.
pub(super) fn append_value_readouts(
    frame: &mut RenderFrame,
    ctx: &SceneContext<'_>,
    series: &SeriesRegistry,
) {
    let right = ctx.layout.right() - VALUE_RIGHT_INSET;
    let mut stacked = 0.0;

    for entry in series.values() {
        let style = entry.style();
        if !style.show_value {
            continue;
        }
        let baseline = ctx.layout.y - VALUE_FIRST_BASELINE_GAP - stacked;
        if baseline <= VALUE_MIN_BASELINE {
            continue;
        }
        let text = format!("{}: {}", entry.label(), format_sample(entry.buffer().latest()));
        frame.texts.push(TextPrimitive::new(
            text,
            right,
            baseline,
            VALUE_FONT_PX,
            style.color,
            TextHAlign::Right,
        ));
        stacked += VALUE_ROW_HEIGHT;
    }
}

/// Vertical crosshair at the pointer plus the sample under it for every
/// series. Nothing is drawn while the pointer is outside the plot area.
pub(super) fn append_crosshair(
    frame: &mut RenderFrame,
    ctx: &SceneContext<'_>,
    series: &SeriesRegistry,
    mouse: Option<(f64, f64)>,
) {
    if !ctx.config.enable_mouse_tooltip {
        return;
    }
    let Some((mx, my)) = mouse else {
        return;
    };
    let layout = ctx.layout;
    if !layout.contains(mx, my) {
        return;
    }

    frame.lines.push(LinePrimitive::new(
        mx,
        layout.y,
        mx,
        layout.bottom(),
        1.0,
        ctx.theme.grid_center,
    ));

    let fraction = (mx - layout.x) / layout.width;
    let label_x = if mx + TOOLTIP_OFFSET_X + TOOLTIP_WIDTH > layout.right() {
        mx - TOOLTIP_WIDTH
    } else {
        mx + TOOLTIP_OFFSET_X
    };
    let mut stacked = 0.0;

    for entry in series.values() {
        let buffer = entry.buffer();
        let count = buffer.len();
        if count < 2 {
            continue;
        }
        let index = ((fraction * (count - 1) as f64).floor().max(0.0) as usize).min(count - 1);
        let Some(value) = buffer.iter().nth(index) else {
            continue;
        };
        if is_missing(value) {
            continue;
        }

        let color = entry.style().color;
        frame.circles.push(CirclePrimitive::new(
            mx,
            ctx.value_to_y(value),
            TOOLTIP_DOT_RADIUS,
            color,
        ));
        frame.texts.push(TextPrimitive::new(
            format!("{}: {}", entry.label(), format_axis_value(value)),
            label_x,
            layout.y + TOOLTIP_FIRST_BASELINE_GAP + stacked,
            TOOLTIP_FONT_PX,
            color,
            TextHAlign::Left,
        ));
        stacked += TOOLTIP_ROW_HEIGHT;
    }
}

/// Bottom status line: shortcut hint on the left, FPS / pause / status on
/// the right.
pub(super) fn append_status_bar(
    frame: &mut RenderFrame,
    ctx: &SceneContext<'_>,
    status: FrameStatus<'_>,
) {
    let theme = ctx.theme;
    let baseline = f64::from(ctx.viewport.height) - STATUS_BASELINE_FROM_BOTTOM;

    if ctx.config.show_shortcuts_hint {
        frame.texts.push(TextPrimitive::new(
            SHORTCUTS_HINT,
            HINT_X,
            baseline,
            HINT_FONT_PX,
            theme.fps_text,
            TextHAlign::Left,
        ));
    }

    let mut parts: SmallVec<[String; 3]> = SmallVec::new();
    if ctx.config.show_fps {
        parts.push(format!("{:.0} FPS", status.fps));
    }
    if status.paused {
        parts.push("|| PAUSED".to_owned());
    }
    if !status.status_text.is_empty() {
        parts.push(status.status_text.to_owned());
    }
    if parts.is_empty() {
        return;
    }

    frame.texts.push(TextPrimitive::new(
        parts.join(" | "),
        f64::from(ctx.viewport.width) - STATUS_RIGHT_INSET,
        baseline,
        STATUS_FONT_PX,
        theme.fps_text,
        TextHAlign::Right,
    ));
}

#[cfg(test)]
mod tests {
    use super::{append_status_bar, append_value_readouts};
    use crate::api::compositor::{FrameStatus, SceneContext};
    use crate::api::{PlotConfig, Series, SeriesRegistry, SeriesStyle, Theme};
    use crate::core::{AxisRange, Margins};
    use crate::render::{Color, RenderFrame};

    fn registry(names: &[&str]) -> SeriesRegistry {
        names
            .iter()
            .map(|name| {
                let series = Series::new(*name, SeriesStyle::new(*name, Color::WHITE), 8)
                    .expect("series");
                ((*name).to_owned(), series)
            })
            .collect()
    }

    #[test]
    fn status_bar_joins_visible_parts() {
        let config = PlotConfig::default();
        let theme = Theme::dark();
        let ctx = SceneContext {
            config: &config,
            theme: &theme,
            viewport: config.viewport(),
            layout: config.layout().expect("layout"),
            range: AxisRange::new(0.0, 1.0),
        };
        let mut frame = RenderFrame::new(ctx.viewport);
        append_status_bar(
            &mut frame,
            &ctx,
            FrameStatus {
                fps: 59.6,
                paused: true,
                mouse: None,
                status_text: "Saved",
            },
        );

        assert_eq!(frame.texts.len(), 2);
        assert_eq!(frame.texts[1].text, "60 FPS | || PAUSED | Saved");
        assert_eq!(frame.texts[1].y, 468.0);
    }

    #[test]
    fn value_readouts_stop_near_the_canvas_top() {
        let config = PlotConfig::default().with_margins(Margins::new(70, 50, 20, 40));
        let theme = Theme::dark();
        let ctx = SceneContext {
            config: &config,
            theme: &theme,
            viewport: config.viewport(),
            layout: config.layout().expect("layout"),
            range: AxisRange::new(0.0, 1.0),
        };
        let mut frame = RenderFrame::new(ctx.viewport);
        append_value_readouts(&mut frame, &ctx, &registry(&["a", "b", "c", "d"]));

        // Baselines 42 and 24 fit; 6 and below are skipped.
        let baselines: Vec<_> = frame.texts.iter().map(|text| text.y).collect();
        assert_eq!(baselines, [42.0, 24.0]);
        assert_eq!(frame.texts[0].text, "a: ---");
    }
}
