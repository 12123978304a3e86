//! Player metric registry: labels, formatting, and colors per stat.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::PlayerSeasonStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum MetricKey {
    Games,
    PlateAppearances,
    Hits,
    HomeRuns,
    Rbi,
    StolenBases,
    Avg,
    Obp,
    Slg,
    Ops,
    Woba,
    WrcPlus,
    KPct,
    BbPct,
    War,
    Innings,
    Era,
    Whip,
    Fip,
    KPer9,
    BbPer9,
    ExitVelocity,
    BarrelPct,
    HardHitPct,
}

impl MetricKey {
    pub fn value(self, row: &PlayerSeasonStats) -> Option<f64> {
        let v = match self {
            MetricKey::Games => row.games,
            MetricKey::PlateAppearances => row.plate_appearances,
            MetricKey::Hits => row.hits,
            MetricKey::HomeRuns => row.home_runs,
            MetricKey::Rbi => row.rbi,
            MetricKey::StolenBases => row.stolen_bases,
            MetricKey::Avg => row.avg,
            MetricKey::Obp => row.obp,
            MetricKey::Slg => row.slg,
            MetricKey::Ops => row.ops,
            MetricKey::Woba => row.woba,
            MetricKey::WrcPlus => row.wrc_plus,
            MetricKey::KPct => row.k_pct,
            MetricKey::BbPct => row.bb_pct,
            MetricKey::War => row.war,
            MetricKey::Innings => row.innings,
            MetricKey::Era => row.era,
            MetricKey::Whip => row.whip,
            MetricKey::Fip => row.fip,
            MetricKey::KPer9 => row.k_per_9,
            MetricKey::BbPer9 => row.bb_per_9,
            MetricKey::ExitVelocity => row.exit_velocity,
            MetricKey::BarrelPct => row.barrel_pct,
            MetricKey::HardHitPct => row.hard_hit_pct,
        };
        v.filter(|v| v.is_finite())
    }

    pub fn spec(self) -> &'static MetricSpec {
        // Every key has exactly one registry entry (checked in tests).
        METRICS
            .iter()
            .find(|m| m.key == self)
            .unwrap_or(&METRICS[0])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub key: MetricKey,
    pub label: &'static str,
    pub short: &'static str,
    /// Formats a display value (already scaled for percentages).
    pub format: fn(f64) -> String,
    pub color: &'static str,
    /// Stored as a fraction, shown ×100 with `%`.
    pub percentage: bool,
}

impl MetricSpec {
    pub fn display_value(&self, raw: f64) -> f64 {
        if self.percentage { raw * 100.0 } else { raw }
    }

    pub fn format_raw(&self, raw: f64) -> String {
        (self.format)(self.display_value(raw))
    }
}

fn count(v: f64) -> String {
    format!("{v:.0}")
}

fn one_decimal(v: f64) -> String {
    format!("{v:.1}")
}

fn two_decimals(v: f64) -> String {
    format!("{v:.2}")
}

/// `.313`, `1.045`. Halves round away from zero (`.3125` -> `.313`).
fn rate(v: f64) -> String {
    let s = format!("{:.3}", (v * 1000.0).round() / 1000.0);
    match s.strip_prefix("0.") {
        Some(rest) => format!(".{rest}"),
        None => s,
    }
}

fn percent(v: f64) -> String {
    format!("{v:.1}%")
}

const fn metric(
    key: MetricKey,
    label: &'static str,
    short: &'static str,
    format: fn(f64) -> String,
    color: &'static str,
    percentage: bool,
) -> MetricSpec {
    MetricSpec {
        key,
        label,
        short,
        format,
        color,
        percentage,
    }
}

pub static METRICS: [MetricSpec; 24] = [
    metric(MetricKey::Games, "Games", "G", count, "#64748b", false),
    metric(MetricKey::PlateAppearances, "Plate appearances", "PA", count, "#475569", false),
    metric(MetricKey::Hits, "Hits", "H", count, "#0ea5e9", false),
    metric(MetricKey::HomeRuns, "Home runs", "HR", count, "#ef4444", false),
    metric(MetricKey::Rbi, "Runs batted in", "RBI", count, "#f97316", false),
    metric(MetricKey::StolenBases, "Stolen bases", "SB", count, "#84cc16", false),
    metric(MetricKey::Avg, "Batting average", "AVG", rate, "#2563eb", false),
    metric(MetricKey::Obp, "On-base percentage", "OBP", rate, "#7c3aed", false),
    metric(MetricKey::Slg, "Slugging percentage", "SLG", rate, "#db2777", false),
    metric(MetricKey::Ops, "On-base plus slugging", "OPS", rate, "#0891b2", false),
    metric(MetricKey::Woba, "Weighted on-base average", "wOBA", rate, "#059669", false),
    metric(MetricKey::WrcPlus, "Weighted runs created plus", "wRC+", count, "#ca8a04", false),
    metric(MetricKey::KPct, "Strikeout rate", "K%", percent, "#dc2626", true),
    metric(MetricKey::BbPct, "Walk rate", "BB%", percent, "#16a34a", true),
    metric(MetricKey::War, "Wins above replacement", "WAR", one_decimal, "#9333ea", false),
    metric(MetricKey::Innings, "Innings pitched", "IP", one_decimal, "#475569", false),
    metric(MetricKey::Era, "Earned run average", "ERA", two_decimals, "#b91c1c", false),
    metric(MetricKey::Whip, "Walks + hits per inning", "WHIP", two_decimals, "#c2410c", false),
    metric(MetricKey::Fip, "Fielding independent pitching", "FIP", two_decimals, "#4f46e5", false),
    metric(MetricKey::KPer9, "Strikeouts per nine", "K/9", one_decimal, "#e11d48", false),
    metric(MetricKey::BbPer9, "Walks per nine", "BB/9", one_decimal, "#15803d", false),
    metric(MetricKey::ExitVelocity, "Average exit velocity", "EV", one_decimal, "#0d9488", false),
    metric(MetricKey::BarrelPct, "Barrel rate", "Barrel%", percent, "#be123c", true),
    metric(MetricKey::HardHitPct, "Hard-hit rate", "HardHit%", percent, "#a16207", true),
];
