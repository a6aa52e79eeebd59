use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Complete color theme for the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub grid_major: Color,
    pub grid_minor: Color,
    pub grid_center: Color,
    pub border: Color,
    pub axis_label: Color,
    pub title: Color,
    pub value_text: Color,
    pub fps_text: Color,
    pub legend_background: Color,
    /// Opacity of the legend box over the plot.
    pub legend_alpha: f64,
    /// Palette handed out to series registered without explicit style.
    pub series_colors: Vec<Color>,
}

impl Theme {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_owned(),
            background: Color::rgb8(24, 18, 18),
            grid_major: Color::rgb8(55, 45, 45),
            grid_minor: Color::rgb8(40, 32, 32),
            grid_center: Color::rgb8(75, 60, 60),
            border: Color::rgb8(65, 50, 50),
            axis_label: Color::rgb8(160, 140, 140),
            title: Color::rgb8(220, 200, 200),
            value_text: Color::rgb8(200, 180, 180),
            fps_text: Color::rgb8(100, 80, 80),
            legend_background: Color::rgb8(40, 30, 30),
            legend_alpha: 0.7,
            series_colors: vec![
                Color::rgb8(255, 100, 255),
                Color::rgb8(100, 255, 100),
                Color::rgb8(255, 200, 100),
                Color::rgb8(255, 180, 80),
                Color::rgb8(255, 100, 100),
                Color::rgb8(100, 255, 255),
                Color::rgb8(255, 100, 150),
                Color::rgb8(50, 200, 255),
            ],
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_owned(),
            background: Color::rgb8(248, 245, 245),
            grid_major: Color::rgb8(218, 210, 210),
            grid_minor: Color::rgb8(234, 228, 228),
            grid_center: Color::rgb8(195, 180, 180),
            border: Color::rgb8(200, 190, 190),
            axis_label: Color::rgb8(100, 80, 80),
            title: Color::rgb8(50, 30, 30),
            value_text: Color::rgb8(70, 50, 50),
            fps_text: Color::rgb8(175, 160, 160),
            legend_background: Color::rgb8(240, 235, 235),
            legend_alpha: 0.85,
            series_colors: vec![
                Color::rgb8(180, 50, 180),
                Color::rgb8(50, 180, 50),
                Color::rgb8(30, 120, 200),
                Color::rgb8(220, 130, 30),
                Color::rgb8(200, 60, 60),
                Color::rgb8(30, 180, 180),
                Color::rgb8(200, 50, 100),
                Color::rgb8(20, 150, 200),
            ],
        }
    }

    #[must_use]
    pub fn midnight() -> Self {
        Self {
            name: "midnight".to_owned(),
            background: Color::rgb8(4, 8, 12),
            grid_major: Color::rgb8(25, 30, 35),
            grid_minor: Color::rgb8(16, 20, 24),
            grid_center: Color::rgb8(35, 45, 55),
            border: Color::rgb8(30, 38, 45),
            axis_label: Color::rgb8(140, 130, 120),
            title: Color::rgb8(210, 195, 180),
            value_text: Color::rgb8(185, 170, 160),
            fps_text: Color::rgb8(85, 75, 70),
            legend_background: Color::rgb8(12, 18, 22),
            legend_alpha: 0.75,
            series_colors: vec![
                Color::rgb8(80, 180, 255),
                Color::rgb8(180, 255, 100),
                Color::rgb8(255, 120, 180),
                Color::rgb8(255, 200, 80),
                Color::rgb8(255, 100, 120),
                Color::rgb8(100, 220, 255),
                Color::rgb8(255, 255, 100),
                Color::rgb8(150, 150, 255),
            ],
        }
    }

    /// Palette color for the `index`-th registered series, cycling.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        if self.series_colors.is_empty() {
            return self.value_text;
        }
        self.series_colors[index % self.series_colors.len()]
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.name.is_empty() {
            return Err(ChartError::InvalidConfig(
                "theme name must not be empty".to_owned(),
            ));
        }
        if !self.legend_alpha.is_finite() || !(0.0..=1.0).contains(&self.legend_alpha) {
            return Err(ChartError::InvalidConfig(format!(
                "theme `{}` legend alpha must be in [0, 1]",
                self.name
            )));
        }
        for color in [
            self.background,
            self.grid_major,
            self.grid_minor,
            self.grid_center,
            self.border,
            self.axis_label,
            self.title,
            self.value_text,
            self.fps_text,
            self.legend_background,
        ]
        .into_iter()
        .chain(self.series_colors.iter().copied())
        {
            color.validate()?;
        }
        Ok(())
    }
}

/// Name-to-theme table owned by one chart.
///
/// Seeded with the built-in `dark`, `light` and `midnight` themes; custom
/// themes registered here are visible to this instance only. Insertion order
/// drives theme cycling.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeRegistry {
    themes: IndexMap<String, Theme>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let mut themes = IndexMap::new();
        for theme in [Theme::dark(), Theme::light(), Theme::midnight()] {
            themes.insert(theme.name.clone(), theme);
        }
        Self { themes }
    }
}

impl ThemeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a theme by name.
    pub fn register(&mut self, theme: Theme) -> ChartResult<()> {
        theme.validate()?;
        debug!(theme = %theme.name, "register theme");
        self.themes.insert(theme.name.clone(), theme);
        Ok(())
    }

    pub fn get(&self, name: &str) -> ChartResult<&Theme> {
        self.themes.get(name).ok_or_else(|| self.unknown_theme(name))
    }

    /// Lookup failure for `name`, listing every registered theme.
    #[must_use]
    pub fn unknown_theme(&self, name: &str) -> ChartError {
        ChartError::UnknownTheme {
            name: name.to_owned(),
            available: self.names().collect::<Vec<_>>().join(", "),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Theme following `current` in cycling order; wraps around, and starts
    /// from the first entry when `current` is unknown.
    #[must_use]
    pub fn next_after(&self, current: &str) -> Option<&Theme> {
        let next_index = match self.themes.get_index_of(current) {
            Some(index) => (index + 1) % self.themes.len(),
            None => 0,
        };
        self.themes.get_index(next_index).map(|(_, theme)| theme)
    }
}
