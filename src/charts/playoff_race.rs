//! Playoff odds over the season.

use std::collections::BTreeMap;

use crate::charts::{requested_teams, team_entries};
use crate::charts::time_series::{Series, TimeSeriesSpec, render_time_series};
use crate::domain::teams::{team_color, team_name};
use crate::domain::{OddsMetric, PlayoffOddsPoint};
use crate::render::dom::Container;
use crate::render::theme::{ColorTheme, RenderContext};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceConfig {
    /// Empty means every team in the data.
    pub teams: Vec<String>,
    pub metric: OddsMetric,
    pub title: Option<String>,
    pub theme: Option<ColorTheme>,
}

pub fn render_playoff_race(
    container: &mut Container,
    data: &BTreeMap<String, Vec<PlayoffOddsPoint>>,
    config: &RaceConfig,
    ctx: &RenderContext,
) {
    let theme = ctx.resolve_theme(config.theme.as_ref()).clone();
    let metric = config.metric;
    let series = requested_teams(&config.teams, data.keys().map(String::as_str))
        .into_iter()
        .filter_map(|team| {
            let points: Vec<_> = team_entries(data, &team)?
                .into_iter()
                .filter_map(|p| Some((p.date, metric.value(p)?)))
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
        aria_label: metric.label().to_string(),
        y_label: format!("{} (%)", metric.label()),
        y_domain: Some((0.0, 100.0)),
        y_padding: 0.0,
        reference: None,
        format_value: format_pct,
        empty_message: "No playoff odds available for the selected teams.",
    };
    render_time_series(container, series, &spec, &theme, ctx);
}

fn format_pct(v: f64) -> String {
    format!("{v:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::render::motion::settled_attr;
    use crate::render::theme::ThemeMode;

    fn point(day: u32, pct: f64) -> PlayoffOddsPoint {
        PlayoffOddsPoint {
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            playoff_pct: pct,
            division_pct: Some(pct / 2.0),
            wildcard_pct: None,
        }
    }

    fn data() -> BTreeMap<String, Vec<PlayoffOddsPoint>> {
        let mut m = BTreeMap::new();
        m.insert("NYY".to_string(), vec![point(1, 55.0), point(8, 61.2), point(15, 64.0)]);
        m.insert("BOS".to_string(), vec![point(15, 38.5)]);
        m
    }

    #[test]
    fn single_point_series_renders_as_fading_dot() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, false);
        let mut c = Container::sized(720.0, 380.0);
        let config = RaceConfig {
            teams: vec!["NYY".into(), "BOS".into()],
            ..RaceConfig::default()
        };
        render_playoff_race(&mut c, &data(), &config, &ctx);
        assert_eq!(c.dom().find_all("series-line").len(), 1);
        let dots = c.dom().find_all("series-dot");
        assert_eq!(dots.len(), 1);
        assert_eq!(dots[0].data("key"), Some("BOS"));
        assert_eq!(dots[0].get_attr("opacity"), Some("0"));
        assert_eq!(settled_attr(dots[0], "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn y_axis_is_fixed_zero_to_hundred() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::sized(720.0, 380.0);
        render_playoff_race(&mut c, &data(), &RaceConfig::default(), &ctx);
        let markup = c.to_markup();
        assert!(markup.contains(">100.0%<"));
        assert!(markup.contains(">0.0%<"));
    }

    #[test]
    fn metric_without_values_is_empty_state() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::sized(720.0, 380.0);
        let config = RaceConfig {
            metric: OddsMetric::Wildcard,
            ..RaceConfig::default()
        };
        render_playoff_race(&mut c, &data(), &config, &ctx);
        assert_eq!(c.count_tag("svg"), 0);
        assert_eq!(c.children().len(), 1);
    }

    #[test]
    fn rendering_twice_replaces_the_chart() {
        let ctx = RenderContext::for_mode(ThemeMode::Dark, false);
        let mut c = Container::sized(720.0, 380.0);
        render_playoff_race(&mut c, &data(), &RaceConfig::default(), &ctx);
        let first = c.to_markup();
        render_playoff_race(&mut c, &data(), &RaceConfig::default(), &ctx);
        assert_eq!(c.to_markup(), first);
        assert_eq!(c.count_tag("svg"), 1);
    }

    #[test]
    fn legacy_keys_plot_under_the_canonical_code() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::sized(720.0, 380.0);
        let mut m = BTreeMap::new();
        m.insert("TBR".to_string(), vec![point(1, 40.0), point(8, 45.0)]);
        let config = RaceConfig {
            teams: vec!["TB".into()],
            ..RaceConfig::default()
        };
        render_playoff_race(&mut c, &m, &config, &ctx);
        let lines = c.dom().find_all("series-line");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].data("key"), Some("TB"));
    }
}
