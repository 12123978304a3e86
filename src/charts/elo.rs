//! ELO rating trend for one season.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::charts::{requested_teams, team_entries};
use crate::charts::time_series::{ReferenceLine, Series, TimeSeriesSpec, render_time_series};
use crate::domain::EloPoint;
use crate::domain::teams::{team_color, team_name};
use crate::render::dom::Container;
use crate::render::theme::{ColorTheme, RenderContext};

/// League-average rating.
pub const ELO_BASELINE: f64 = 1500.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EloConfig {
    /// Empty means every team in the data.
    pub teams: Vec<String>,
    pub season: i32,
    pub title: Option<String>,
    pub theme: Option<ColorTheme>,
}

pub fn render_elo_trend(
    container: &mut Container,
    data: &BTreeMap<String, Vec<EloPoint>>,
    config: &EloConfig,
    ctx: &RenderContext,
) {
    let theme = ctx.resolve_theme(config.theme.as_ref()).clone();
    let series = requested_teams(&config.teams, data.keys().map(String::as_str))
        .into_iter()
        .filter_map(|team| {
            let points: Vec<_> = team_entries(data, &team)?
                .into_iter()
                .filter(|p| p.date.year() == config.season)
                .map(|p| (p.date, p.elo))
                .collect();
            Some(Series {
                label: team_name(&team).to_string(),
                color: team_color(&team).to_string(),
                key: team,
                points,
            })
        })
        .collect();

    let spec = TimeSeriesSpec {
        title: config.title.clone(),
        aria_label: format!("{} ELO ratings", config.season),
        y_label: "ELO rating".to_string(),
        y_domain: None,
        y_padding: 15.0,
        reference: Some(ReferenceLine {
            value: ELO_BASELINE,
            label: "League average",
        }),
        format_value: format_elo,
        empty_message: "No ELO history available for the selected teams.",
    };
    render_time_series(container, series, &spec, &theme, ctx);
}

fn format_elo(v: f64) -> String {
    format!("{v:.0}")
}
