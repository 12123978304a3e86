//! Projected win-distribution chart.
//!
//! One or two teams render as grouped bars ([`bar`]); three or more render as
//! overlaid smoothed areas ([`curve`]). The switch is [`ChartMode::for_team_count`]
//! and is not configurable.

mod bar;
mod curve;
pub mod labels;

use std::collections::BTreeMap;

use tracing::debug;

use crate::charts::{VIEW_WIDTH, requested_teams};
use crate::domain::TeamProjection;
use crate::domain::teams::{normalize_team_code, team_color};
use crate::math::{DiscretizedWinDistribution, POINT_ESTIMATE, SIMULATION_COUNT, format_share};
use crate::render::axis::{Tick, axis_label_left, axis_left, chart_title, grid_horizontal};
use crate::render::dom::{Container, Element};
use crate::render::render_empty_state;
use crate::render::scale::LinearScale;
use crate::render::svg::{Margin, ResponsiveSvg};
use crate::render::theme::{ColorTheme, RenderContext, TICK_SIZE};
use crate::render::tooltip::{TooltipContent, TooltipRow};

pub use labels::{LABEL_ROW_HEIGHT, LabelBox, place_label};

pub const EMPTY_MESSAGE: &str = "No projection data available for the selected teams.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinDistConfig {
    /// Team codes in display order; empty means every team in the data.
    pub teams: Vec<String>,
    pub title: Option<String>,
    /// Overrides the context theme.
    pub theme: Option<ColorTheme>,
    /// Shorter chart for sidebars.
    pub compact: bool,
    /// Previous snapshot's point estimate per team, for the delta callout.
    pub prev_medians: BTreeMap<String, f64>,
    /// Snapshot date shown as a footnote.
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Bars,
    Curves,
}

impl ChartMode {
    pub fn for_team_count(n: usize) -> Self {
        if n > 2 { ChartMode::Curves } else { ChartMode::Bars }
    }
}

/// One selected team, ready to draw.
#[derive(Debug, Clone)]
pub(crate) struct TeamSeries {
    pub code: String,
    pub color: String,
    pub dist: DiscretizedWinDistribution,
    pub estimate: i32,
    pub previous: Option<f64>,
}

pub fn render_win_distribution(
    container: &mut Container,
    data: &[TeamProjection],
    config: &WinDistConfig,
    ctx: &RenderContext,
) {
    let theme = ctx.resolve_theme(config.theme.as_ref()).clone();
    container.clear();

    let teams = select_teams(data, config);
    if teams.is_empty() {
        debug!(requested = ?config.teams, "win distribution: no matching projections");
        render_empty_state(container, EMPTY_MESSAGE, &theme);
        return;
    }

    let mode = ChartMode::for_team_count(teams.len());
    debug!(teams = teams.len(), ?mode, "rendering win distribution");
    match mode {
        ChartMode::Bars => bar::render(container, &teams, config, &theme, ctx),
        ChartMode::Curves => curve::render(container, &teams, config, &theme, ctx),
    }
}

fn select_teams(data: &[TeamProjection], config: &WinDistConfig) -> Vec<TeamSeries> {
    let codes = requested_teams(&config.teams, data.iter().map(|p| p.team.as_str()));
    let mut out: Vec<TeamSeries> = Vec::new();
    for code in codes {
        if out.iter().any(|t| t.code == code) {
            continue;
        }
        let Some(projection) = data.iter().find(|p| normalize_team_code(&p.team) == code) else {
            continue;
        };
        let dist = DiscretizedWinDistribution::from(projection);
        if dist.bins.is_empty() {
            continue;
        }
        out.push(TeamSeries {
            color: team_color(&code).to_string(),
            estimate: POINT_ESTIMATE.of(projection),
            previous: config.prev_medians.get(&code).copied(),
            dist,
            code,
        });
    }
    out
}

/// `"91 wins ↑3"`; the delta is omitted without a previous value.
pub fn callout_label(estimate: i32, previous: Option<f64>) -> String {
    let Some(prev) = previous.filter(|p| p.is_finite()) else {
        return format!("{estimate} wins");
    };
    let delta = (estimate as f64 - prev).round() as i64;
    match delta {
        d if d > 0 => format!("{estimate} wins ↑{d}"),
        d if d < 0 => format!("{estimate} wins ↓{}", -d),
        _ => format!("{estimate} wins ±0"),
    }
}

/// `12345 -> "12,345"`.
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub(crate) fn combined_domain(teams: &[TeamSeries]) -> (i32, i32) {
    let lo = teams.iter().filter_map(|t| t.dist.domain()).map(|d| d.0).min().unwrap_or(0);
    let hi = teams.iter().filter_map(|t| t.dist.domain()).map(|d| d.1).max().unwrap_or(0);
    (lo, hi)
}

/// Y-scale over simulated frequency with headroom for callouts.
pub(crate) fn frequency_scale(teams: &[TeamSeries], height: f64) -> LinearScale {
    let max = teams
        .iter()
        .flat_map(|t| t.dist.bins.iter().map(|b| b.frequency))
        .max()
        .unwrap_or(0)
        .max(1);
    LinearScale::new((0.0, max as f64 * 1.15), (height, 0.0)).nice(5)
}

pub(crate) fn win_ticks(lo: i32, hi: i32) -> Vec<i32> {
    let every = if hi - lo > 50 { 10 } else { 5 };
    (lo..=hi).filter(|w| w % every == 0).collect()
}

pub(crate) fn new_svg(config: &WinDistConfig, theme: &ColorTheme) -> ResponsiveSvg {
    let height = if config.compact { 300.0 } else { 400.0 };
    let top = if config.title.is_some() { 44.0 } else { 20.0 };
    let mut svg = ResponsiveSvg::new(VIEW_WIDTH, height, Margin::new(top, 24.0, 52.0, 64.0), theme);
    svg.set_label(config.title.as_deref().unwrap_or("Projected win distribution"));
    if let Some(title) = &config.title {
        let el = chart_title(title, svg.inner_width, -top / 2.0, theme);
        svg.plot.push(el);
    }
    svg
}

pub(crate) fn frequency_grid(svg: &mut ResponsiveSvg, y: &LinearScale, theme: &ColorTheme) {
    let positions: Vec<f64> = y.ticks(5).into_iter().map(|v| y.scale(v)).collect();
    let grid = grid_horizontal(&positions, svg.inner_width, theme);
    svg.plot.push(grid);
}

pub(crate) fn frequency_axis(svg: &mut ResponsiveSvg, y: &LinearScale, theme: &ColorTheme) {
    let ticks: Vec<Tick> = y
        .ticks(5)
        .into_iter()
        .map(|v| Tick::new(y.scale(v), thousands(v.max(0.0) as u64)))
        .collect();
    let h = svg.inner_height;
    svg.plot.push(axis_left(&ticks, h, theme));
    svg.plot.push(axis_label_left(
        &format!("Simulations (of {})", thousands(SIMULATION_COUNT as u64)),
        h,
        50.0,
        theme,
    ));
    svg.plot.push(
        Element::new("text")
            .class("axis-label")
            .attr("x", svg.inner_width / 2.0)
            .attr("y", h + 40.0)
            .attr("text-anchor", "middle")
            .attr("fill", theme.text_muted.as_str())
            .attr("font-size", TICK_SIZE)
            .text("Projected wins"),
    );
}

pub(crate) fn footnote(svg: &mut ResponsiveSvg, config: &WinDistConfig, theme: &ColorTheme) {
    if let Some(updated) = &config.updated {
        svg.plot.push(
            Element::new("text")
                .class("chart-footnote")
                .attr("x", svg.inner_width)
                .attr("y", svg.inner_height + 40.0)
                .attr("text-anchor", "end")
                .attr("fill", theme.text_muted.as_str())
                .attr("font-size", TICK_SIZE)
                .text(format!("Updated {updated}")),
        );
    }
}

/// Tooltip listing every team's simulated frequency at `wins`.
pub(crate) fn frequency_tooltip(wins: i32, teams: &[(String, String, DiscretizedWinDistribution)], by_frequency: bool) -> TooltipContent {
    let mut rows: Vec<(u32, TooltipRow)> = teams
        .iter()
        .map(|(code, color, dist)| {
            let freq = dist.frequency_at(wins).unwrap_or(0);
            let value = format!("{} ({})", thousands(freq as u64), format_share(freq, SIMULATION_COUNT));
            (freq, TooltipRow::new(code.clone(), value).colored(color))
        })
        .collect();
    if by_frequency {
        rows.sort_by(|a, b| b.0.cmp(&a.0));
    }
    let mut content = TooltipContent::new(format!("{wins} wins"));
    content.rows = rows.into_iter().map(|(_, row)| row).collect();
    content
}

pub(crate) fn hover_teams(teams: &[TeamSeries]) -> Vec<(String, String, DiscretizedWinDistribution)> {
    teams
        .iter()
        .map(|t| (t.code.clone(), t.color.clone(), t.dist.clone()))
        .collect()
}
