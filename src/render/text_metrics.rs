/// Deterministic, backend-independent width estimate for a label.
///
/// Layout decisions (legend width, tooltip flipping) must not depend on
/// which raster backend is attached, so they use this estimate instead of
/// real font metrics.
#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' | ':' | '|' => 0.34,
            '-' | '+' | '%' | '[' | ']' => 0.42,
            ' ' => 0.33,
            'A'..='Z' => 0.68,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}
