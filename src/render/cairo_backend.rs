use std::f64::consts::TAU;
use std::sync::Arc;

use cairo::{Antialias, Context, Format, ImageSurface, LineCap, LineJoin, Operator};
use image::RgbImage;
use pango::FontDescription;
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, ComposedFrame, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub background_rebuilt: bool,
    pub primitives_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango raster backend.
///
/// The background scene is rasterized into its own surface and only redrawn
/// when the compositor hands over a different background allocation; every
/// frame starts by copying that surface over the canvas with
/// `Operator::Source`, then paints the overlay layers on top.
#[derive(Debug)]
pub struct CairoRenderer {
    canvas_surface: ImageSurface,
    background_surface: ImageSurface,
    last_background: Option<Arc<RenderFrame>>,
    antialias: Antialias,
    canvas: RgbImage,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: u32, height: u32, antialiased: bool) -> ChartResult<Self> {
        let (surface_width, surface_height) = match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(ChartError::InvalidViewport { width, height }),
        };

        let canvas_surface = ImageSurface::create(Format::Rgb24, surface_width, surface_height)
            .map_err(|err| map_backend_error("failed to create canvas surface", err))?;
        let background_surface =
            ImageSurface::create(Format::Rgb24, surface_width, surface_height)
                .map_err(|err| map_backend_error("failed to create background surface", err))?;

        Ok(Self {
            canvas_surface,
            background_surface,
            last_background: None,
            antialias: if antialiased {
                Antialias::Default
            } else {
                Antialias::None
            },
            canvas: RgbImage::new(width, height),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn rebuild_background(&mut self, background: &Arc<RenderFrame>) -> ChartResult<usize> {
        let context = Context::new(&self.background_surface)
            .map_err(|err| map_backend_error("failed to create background context", err))?;
        context.set_antialias(self.antialias);
        context.set_operator(Operator::Source);
        context.set_source_rgb(0.0, 0.0, 0.0);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear background", err))?;
        context.set_operator(Operator::Over);

        let drawn = paint_frame(&context, background)?;
        drop(context);
        self.background_surface.flush();
        self.last_background = Some(Arc::clone(background));
        Ok(drawn)
    }

    fn compose(&mut self, frame: &ComposedFrame) -> ChartResult<CairoRenderStats> {
        let mut stats = CairoRenderStats::default();

        let reuse = self
            .last_background
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, &frame.background));
        if !reuse {
            stats.primitives_drawn += self.rebuild_background(&frame.background)?;
            stats.background_rebuilt = true;
            trace!("cairo background rasterized");
        }

        let context = Context::new(&self.canvas_surface)
            .map_err(|err| map_backend_error("failed to create canvas context", err))?;
        context.set_antialias(self.antialias);
        context.set_operator(Operator::Source);
        context
            .set_source_surface(&self.background_surface, 0.0, 0.0)
            .map_err(|err| map_backend_error("failed to bind background", err))?;
        context
            .paint()
            .map_err(|err| map_backend_error("failed to copy background", err))?;
        context.set_operator(Operator::Over);

        for layer in &frame.layers {
            stats.primitives_drawn += paint_frame(&context, &layer.frame)?;
            stats.texts_drawn += layer.frame.texts.len();
        }
        stats.texts_drawn += frame.background.texts.len();
        drop(context);
        self.canvas_surface.flush();
        Ok(stats)
    }

    fn copy_canvas_pixels(&mut self) -> ChartResult<()> {
        let stride = usize::try_from(self.canvas_surface.stride())
            .map_err(|_| ChartError::InvalidData("negative cairo stride".to_owned()))?;
        let width = self.canvas.width() as usize;
        let data = self
            .canvas_surface
            .data()
            .map_err(|err| ChartError::InvalidData(format!("failed to borrow canvas: {err}")))?;

        for (y, row) in data.chunks(stride).enumerate().take(self.canvas.height() as usize) {
            for x in 0..width {
                let offset = x * 4;
                let pixel = u32::from_ne_bytes([
                    row[offset],
                    row[offset + 1],
                    row[offset + 2],
                    row[offset + 3],
                ]);
                let rgb = [
                    ((pixel >> 16) & 0xff) as u8,
                    ((pixel >> 8) & 0xff) as u8,
                    (pixel & 0xff) as u8,
                ];
                self.canvas
                    .put_pixel(x as u32, y as u32, image::Rgb(rgb));
            }
        }
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &ComposedFrame) -> ChartResult<()> {
        frame.validate()?;
        let stats = self.compose(frame)?;
        self.copy_canvas_pixels()?;
        self.last_stats = stats;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    fn canvas(&self) -> Option<&RgbImage> {
        Some(&self.canvas)
    }
}

fn paint_frame(context: &Context, frame: &RenderFrame) -> ChartResult<usize> {
    let mut drawn = 0;

    for rect in &frame.rects {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        if let Some(fill) = rect.fill_color {
            apply_color(context, fill);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
        }
        if rect.border_width > 0.0 {
            apply_color(context, rect.border_color);
            context.set_line_width(rect.border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
        }
        context.new_path();
        drawn += 1;
    }

    for line in &frame.lines {
        apply_color(context, line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke line", err))?;
        drawn += 1;
    }

    for polyline in &frame.polylines {
        let Some(((first_x, first_y), rest)) = polyline.points.split_first() else {
            continue;
        };
        apply_color(context, polyline.color);
        context.set_line_width(polyline.stroke_width);
        context.set_line_join(LineJoin::Round);
        context.set_line_cap(LineCap::Round);
        context.move_to(*first_x, *first_y);
        for (x, y) in rest {
            context.line_to(*x, *y);
        }
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
        drawn += 1;
    }

    for circle in &frame.circles {
        apply_color(context, circle.color);
        context.new_sub_path();
        context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill circle", err))?;
        drawn += 1;
    }

    for text in &frame.texts {
        let layout = pangocairo::functions::create_layout(context);
        let mut font_description = FontDescription::from_string("Sans");
        font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, _) = layout.pixel_size();
        let baseline_px = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        apply_color(context, text.color);
        context.move_to(x, text.y - baseline_px);
        pangocairo::functions::show_layout(context, &layout);
        drawn += 1;
    }

    Ok(drawn)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
