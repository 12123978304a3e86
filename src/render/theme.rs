//! Color/font tokens and the per-render context.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Font size for chart titles.
pub const TITLE_SIZE: f64 = 16.0;
/// Font size for annotation labels and legends.
pub const LABEL_SIZE: f64 = 12.0;
/// Font size for axis ticks.
pub const TICK_SIZE: f64 = 11.0;

/// The site's active light/dark setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

/// Named colors and fonts every renderer draws with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub text: String,
    pub text_muted: String,
    pub border: String,
    pub background: String,
    /// Tooltip and legend panel fill.
    pub surface: String,
    pub grid: String,
    pub font_family: String,
}

impl ColorTheme {
    pub fn light() -> Self {
        Self {
            text: "#1a1d23".to_string(),
            text_muted: "#5f6673".to_string(),
            border: "#c9ced6".to_string(),
            background: "#ffffff".to_string(),
            surface: "#ffffff".to_string(),
            grid: "#eceff3".to_string(),
            font_family: "Inter, system-ui, sans-serif".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: "#e8eaed".to_string(),
            text_muted: "#9aa0aa".to_string(),
            border: "#3a3f47".to_string(),
            background: "#121417".to_string(),
            surface: "#1c1f24".to_string(),
            grid: "#23272d".to_string(),
            font_family: "Inter, system-ui, sans-serif".to_string(),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

/// Everything a renderer would otherwise read from page globals.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub theme: ColorTheme,
    pub reduced_motion: bool,
}

impl RenderContext {
    pub fn new(theme: ColorTheme, reduced_motion: bool) -> Self {
        Self {
            theme,
            reduced_motion,
        }
    }

    pub fn for_mode(mode: ThemeMode, reduced_motion: bool) -> Self {
        Self::new(ColorTheme::for_mode(mode), reduced_motion)
    }

    /// A chart-level override wins over the active page theme.
    pub fn resolve_theme<'a>(&'a self, override_theme: Option<&'a ColorTheme>) -> &'a ColorTheme {
        override_theme.unwrap_or(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_active_theme() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, false);
        let dark = ColorTheme::dark();
        assert_eq!(ctx.resolve_theme(Some(&dark)).background, "#121417");
        assert_eq!(ctx.resolve_theme(None).background, "#ffffff");
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!(ThemeMode::parse(" Dark "), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("sepia"), None);
    }
}
