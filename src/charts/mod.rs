//! Chart renderers.
//!
//! Every renderer has the same shape:
//!
//! ```text
//! render_x(container, data, config, ctx)
//! ```
//!
//! It clears the container, then either draws the chart (SVG + tooltip and
//! legend siblings + pointer listeners) or a single empty-state paragraph.
//! Renderers never fail and keep no state between calls.

pub mod elo;
pub mod metrics;
pub mod player;
pub mod playoff_race;
pub mod time_series;
pub mod win_dist;

pub use elo::{EloConfig, render_elo_trend};
pub use player::{PlayerChartConfig, render_player_stats};
pub use playoff_race::{RaceConfig, render_playoff_race};
pub use win_dist::{ChartMode, WinDistConfig, render_win_distribution};

use std::collections::BTreeMap;

use crate::domain::teams::normalize_team_code;
use crate::render::dom::Element;

/// Intrinsic view-box width shared by all charts.
pub const VIEW_WIDTH: f64 = 720.0;

pub(crate) const HOVER_OVERLAY_CLASS: &str = "hover-overlay";
pub(crate) const HOVER_RULE_CLASS: &str = "hover-rule";

/// Transparent rect that makes the whole plot area hoverable.
pub(crate) fn hover_overlay(width: f64, height: f64) -> Element {
    Element::new("rect")
        .class(HOVER_OVERLAY_CLASS)
        .attr("width", width)
        .attr("height", height)
        .attr("fill", "transparent")
        .style("cursor", "crosshair")
}

/// Hidden vertical rule shown at the hovered x.
pub(crate) fn hover_rule(height: f64, color: &str) -> Element {
    Element::new("line")
        .class(HOVER_RULE_CLASS)
        .attr("x1", 0.0)
        .attr("x2", 0.0)
        .attr("y1", 0.0)
        .attr("y2", height)
        .attr("stroke", color)
        .attr("stroke-dasharray", "2 2")
        .attr("opacity", 0.0)
}

/// Requested team codes in request order; every available code when none are requested.
///
/// Codes come back normalized and without duplicates.
pub(crate) fn requested_teams<'a>(requested: &[String], available: impl Iterator<Item = &'a str>) -> Vec<String> {
    let codes: Vec<String> = if requested.is_empty() {
        available.map(normalize_team_code).collect()
    } else {
        requested.iter().map(|t| normalize_team_code(t)).collect()
    };
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

/// Every entry filed under a key that normalizes to `team`; `None` when there is none.
pub(crate) fn team_entries<'a, T>(data: &'a BTreeMap<String, Vec<T>>, team: &str) -> Option<Vec<&'a T>> {
    let mut keys = data.keys().filter(|k| normalize_team_code(k) == team).peekable();
    keys.peek()?;
    Some(keys.flat_map(move |k| data[k].iter()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_teams_normalize_and_fall_back_to_all() {
        let avail = ["BOS", "NYY"];
        assert_eq!(requested_teams(&[], avail.iter().copied()), vec!["BOS", "NYY"]);
        assert_eq!(
            requested_teams(&["oak".to_string(), "NYY".to_string()], avail.iter().copied()),
            vec!["ATH", "NYY"]
        );
    }

    #[test]
    fn fallback_codes_are_normalized_and_deduplicated() {
        let avail = ["ATH", "NYY", "OAK", "ari"];
        assert_eq!(requested_teams(&[], avail.iter().copied()), vec!["ATH", "NYY", "AZ"]);
    }

    #[test]
    fn team_entries_merge_legacy_keys() {
        let mut data = BTreeMap::new();
        data.insert("OAK".to_string(), vec![1, 2]);
        data.insert("ATH".to_string(), vec![3]);
        data.insert("NYY".to_string(), vec![9]);
        let ath: Vec<i32> = team_entries(&data, "ATH").unwrap().into_iter().copied().collect();
        assert_eq!(ath, vec![3, 1, 2]);
        assert!(team_entries(&data, "SEA").is_none());
    }
}
