use crate::core::format_axis_value;
use crate::render::{
    LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, estimate_text_width_px,
};

use super::compositor::SceneContext;

pub(super) const AXIS_LABEL_FONT_PX: f64 = 11.0;
pub(super) const TITLE_FONT_PX: f64 = 20.0;
const AXIS_LABEL_X: f64 = 5.0;
const AXIS_LABEL_BASELINE_OFFSET: f64 = 4.0;
const TITLE_BASELINE_OFFSET: f64 = 15.0;
const ZERO_LINE_WIDTH: f64 = 2.0;

/// Static scene: canvas fill, grid, axis labels, zero line, border and title.
pub(super) fn build_background(ctx: &SceneContext<'_>) -> RenderFrame {
    let theme = ctx.theme;
    let config = ctx.config;
    let layout = ctx.layout;
    let range = ctx.range;
    let span = range.effective_span();

    let mut frame = RenderFrame::new(ctx.viewport).with_rect(RectPrimitive::filled(
        0.0,
        0.0,
        f64::from(ctx.viewport.width),
        f64::from(ctx.viewport.height),
        theme.background,
    ));

    let spacing = f64::from(config.grid_x_spacing.max(1));
    let mut offset = 0.0;
    while offset <= layout.width {
        let x = layout.x + offset;
        frame.lines.push(LinePrimitive::new(
            x,
            layout.y,
            x,
            layout.bottom(),
            1.0,
            theme.grid_minor,
        ));
        offset += spacing;
    }

    let divisions = config.grid_y_divisions.max(1);
    for i in 0..=divisions {
        let fraction = f64::from(i) / f64::from(divisions);
        let y = layout.y + (fraction * layout.height).floor();
        frame.lines.push(LinePrimitive::new(
            layout.x,
            y,
            layout.right(),
            y,
            1.0,
            theme.grid_major,
        ));

        let value = if config.invert_y {
            range.hi - fraction * span
        } else {
            range.lo + fraction * span
        };
        frame.texts.push(TextPrimitive::new(
            format_axis_value(value),
            AXIS_LABEL_X,
            y + AXIS_LABEL_BASELINE_OFFSET,
            AXIS_LABEL_FONT_PX,
            theme.axis_label,
            TextHAlign::Left,
        ));
    }

    if config.show_zero_line && range.contains_strictly(0.0) {
        let fraction = if config.invert_y {
            range.hi / span
        } else {
            -range.lo / span
        };
        let y = layout.y + (fraction * layout.height).floor();
        frame.lines.push(LinePrimitive::new(
            layout.x,
            y,
            layout.right(),
            y,
            ZERO_LINE_WIDTH,
            theme.grid_center,
        ));
    }

    frame.rects.push(RectPrimitive::outlined(
        layout.x,
        layout.y,
        layout.width,
        layout.height,
        theme.border,
        1.0,
    ));

    if !config.title.is_empty() {
        let title_width = estimate_text_width_px(&config.title, TITLE_FONT_PX);
        frame.texts.push(TextPrimitive::new(
            config.title.clone(),
            layout.x + ((layout.width - title_width) / 2.0).floor(),
            layout.y - TITLE_BASELINE_OFFSET,
            TITLE_FONT_PX,
            theme.title,
            TextHAlign::Left,
        ));
    }

    frame
}
