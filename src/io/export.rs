//! Exports: standalone chart pages and simulation JSON.
//!
//! The HTML page is self-contained (no scripts, no external CSS) so a rendered
//! chart, including a snapshotted hover state, can be opened or diffed as-is.
//! The JSON payloads keep the field names the site's data files use.

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{PlayoffOdds, TeamProjection};
use crate::error::AppError;
use crate::render::EMPTY_CLASS;
use crate::render::dom::{Container, escape_text, fmt_num};
use crate::render::legend::LEGEND_CLASS;
use crate::render::theme::ColorTheme;
use crate::render::tooltip::TOOLTIP_CLASS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionsFile {
    pub updated: String,
    pub simulations: usize,
    pub projections: Vec<TeamProjection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffOddsFile {
    pub updated: String,
    pub simulations: usize,
    pub odds: Vec<PlayoffOdds>,
}

/// Full HTML document around the container's markup.
pub fn chart_html(title: &str, container: &Container, theme: &ColorTheme) -> String {
    let bounds = container.bounds();
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_text(title));
    out.push_str("<style>\n");
    let _ = writeln!(
        out,
        "body {{ margin: 24px; background: {}; color: {}; font-family: {}; }}",
        theme.background, theme.text, theme.font_family
    );
    let _ = writeln!(
        out,
        ".chart {{ position: relative; width: {}px; max-width: 100%; }}",
        fmt_num(bounds.width)
    );
    out.push_str(".chart svg { display: block; width: 100%; height: auto; }\n");
    let _ = writeln!(
        out,
        ".{TOOLTIP_CLASS} {{ padding: 6px 8px; border-radius: 4px; white-space: nowrap; box-shadow: 0 2px 6px rgba(0,0,0,.15); }}"
    );
    out.push_str(".tt-title { font-weight: 600; margin-bottom: 2px; }\n");
    out.push_str(".tt-row { display: flex; gap: 6px; align-items: center; }\n");
    out.push_str(".tt-swatch { display: inline-block; width: 8px; height: 8px; border-radius: 50%; }\n");
    out.push_str(".tt-value { margin-left: auto; font-variant-numeric: tabular-nums; }\n");
    let _ = writeln!(out, ".{LEGEND_CLASS} {{ margin-top: 8px; }}");
    out.push_str(".legend-item { display: inline-flex; gap: 4px; align-items: center; }\n");
    let _ = writeln!(
        out,
        ".{EMPTY_CLASS} {{ padding: 48px 0; text-align: center; color: {}; }}",
        theme.text_muted
    );
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str("<div class=\"chart\">");
    out.push_str(&container.to_markup());
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

pub fn write_chart_html(path: &Path, title: &str, container: &Container, theme: &ColorTheme) -> Result<(), AppError> {
    std::fs::write(path, chart_html(title, container, theme))
        .map_err(|e| AppError::new(2, format!("Failed to write chart HTML '{}': {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create {what} JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value).map_err(|e| AppError::new(2, format!("Failed to write {what} JSON: {e}")))
}

pub fn write_projections_json(path: &Path, file: &ProjectionsFile) -> Result<(), AppError> {
    write_json(path, file, "projections")
}

pub fn write_playoff_odds_json(path: &Path, file: &PlayoffOddsFile) -> Result<(), AppError> {
    write_json(path, file, "playoff odds")
}
