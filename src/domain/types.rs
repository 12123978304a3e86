//! Shared domain types.
//!
//! Everything here is plain data, serializable so it can be:
//!
//! - loaded from JSON/CSV snapshots
//! - produced by the season simulator
//! - handed to renderers read-only

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Season-simulation summary for one team.
///
/// Percentiles are whole win totals in published snapshots but are kept as
/// `f64` so hand-edited files with fractional values still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProjection {
    pub team: String,
    pub median_wins: f64,
    pub avg_wins: f64,
    pub std_dev: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

/// One day's ELO rating for a team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloPoint {
    pub date: NaiveDate,
    pub elo: f64,
}

/// One day's playoff odds for a team, in percent (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayoffOddsPoint {
    pub date: NaiveDate,
    pub playoff_pct: f64,
    #[serde(default)]
    pub division_pct: Option<f64>,
    #[serde(default)]
    pub wildcard_pct: Option<f64>,
}

/// Which odds series the playoff-race chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OddsMetric {
    #[default]
    Playoff,
    Division,
    Wildcard,
}

impl OddsMetric {
    pub fn value(self, point: &PlayoffOddsPoint) -> Option<f64> {
        match self {
            OddsMetric::Playoff => Some(point.playoff_pct),
            OddsMetric::Division => point.division_pct,
            OddsMetric::Wildcard => point.wildcard_pct,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OddsMetric::Playoff => "Playoff odds",
            OddsMetric::Division => "Division odds",
            OddsMetric::Wildcard => "Wild card odds",
        }
    }
}

/// One row per season for one player. Any field may be absent.
///
/// Rate stats (`avg`, `obp`, `k_pct`, …) are fractions, not percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub season: i32,
    #[serde(default)]
    pub team: Option<String>,
    // batting
    #[serde(default)]
    pub games: Option<f64>,
    #[serde(default)]
    pub plate_appearances: Option<f64>,
    #[serde(default)]
    pub hits: Option<f64>,
    #[serde(default)]
    pub home_runs: Option<f64>,
    #[serde(default)]
    pub rbi: Option<f64>,
    #[serde(default)]
    pub stolen_bases: Option<f64>,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub obp: Option<f64>,
    #[serde(default)]
    pub slg: Option<f64>,
    #[serde(default)]
    pub ops: Option<f64>,
    #[serde(default)]
    pub woba: Option<f64>,
    #[serde(default)]
    pub wrc_plus: Option<f64>,
    #[serde(default)]
    pub k_pct: Option<f64>,
    #[serde(default)]
    pub bb_pct: Option<f64>,
    #[serde(default)]
    pub war: Option<f64>,
    // pitching
    #[serde(default)]
    pub innings: Option<f64>,
    #[serde(default)]
    pub era: Option<f64>,
    #[serde(default)]
    pub whip: Option<f64>,
    #[serde(default)]
    pub fip: Option<f64>,
    #[serde(default)]
    pub k_per_9: Option<f64>,
    #[serde(default)]
    pub bb_per_9: Option<f64>,
    // statcast
    #[serde(default)]
    pub exit_velocity: Option<f64>,
    #[serde(default)]
    pub barrel_pct: Option<f64>,
    #[serde(default)]
    pub hard_hit_pct: Option<f64>,
}

/// A scheduled (or completed) regular-season game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl ScheduledGame {
    /// Winner of a completed game; `None` while unplayed (or tied, which MLB never records).
    pub fn winner(&self) -> Option<&str> {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) if h > a => Some(&self.home_team),
            (Some(h), Some(a)) if a > h => Some(&self.away_team),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }
}

/// Simulated postseason chances for one team, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffOdds {
    pub team: String,
    pub playoff_pct: f64,
    pub division_pct: f64,
    pub wildcard_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odds_point_optional_fields_default_to_none() {
        let p: PlayoffOddsPoint =
            serde_json::from_str(r#"{"date":"2026-05-01","playoff_pct":41.5}"#).unwrap();
        assert_eq!(p.division_pct, None);
        assert_eq!(OddsMetric::Playoff.value(&p), Some(41.5));
        assert_eq!(OddsMetric::Wildcard.value(&p), None);
    }

    #[test]
    fn completed_game_winner() {
        let g = ScheduledGame {
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            home_team: "NYY".into(),
            away_team: "BOS".into(),
            home_score: Some(2),
            away_score: Some(5),
        };
        assert_eq!(g.winner(), Some("BOS"));
        assert!(g.is_completed());
    }
}
