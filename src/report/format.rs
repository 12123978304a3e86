//! Formatted terminal output for simulation results.
//!
//! Formatting lives here so the simulator and renderers stay free of
//! presentation concerns, and so table layout changes stay in one file
//! (the golden tests below pin it).

use crate::domain::teams::team_name;
use crate::domain::{PlayoffOdds, TeamProjection};
use crate::math::{CONFIDENCE_LEVEL, confidence_interval};

/// Projection table: mean, median, spread, confidence band, and percentiles.
pub fn format_projection_table(projections: &[TeamProjection]) -> String {
    let mut out = String::new();

    let ci_header = format!("{} CI", CONFIDENCE_LEVEL.label());
    out.push_str(&projection_line([
        "team", "name", "mean", "median", "sd", &ci_header, "p10", "p25", "p75", "p90",
    ]));
    out.push_str(&projection_line([
        &"-".repeat(4),
        &"-".repeat(22),
        &"-".repeat(6),
        &"-".repeat(6),
        &"-".repeat(5),
        &"-".repeat(11),
        &"-".repeat(4),
        &"-".repeat(4),
        &"-".repeat(4),
        &"-".repeat(4),
    ]));

    for p in projections {
        let (lo, hi) = confidence_interval(p.avg_wins, p.std_dev);
        out.push_str(&projection_line([
            &p.team,
            &truncate(team_name(&p.team), 22),
            &format!("{:.1}", p.avg_wins),
            &format!("{:.0}", p.median_wins),
            &format!("{:.2}", p.std_dev),
            &format!("{lo:.1}-{hi:.1}"),
            &format!("{:.0}", p.p10),
            &format!("{:.0}", p.p25),
            &format!("{:.0}", p.p75),
            &format!("{:.0}", p.p90),
        ]));
    }

    out
}

/// Playoff, division, and wild-card percentages per team.
pub fn format_playoff_odds(odds: &[PlayoffOdds]) -> String {
    let mut out = String::new();

    out.push_str(&odds_line(["team", "name", "playoff", "division", "wildcard"]));
    out.push_str(&odds_line([
        &"-".repeat(4),
        &"-".repeat(22),
        &"-".repeat(8),
        &"-".repeat(8),
        &"-".repeat(8),
    ]));

    for o in odds {
        out.push_str(&odds_line([
            &o.team,
            &truncate(team_name(&o.team), 22),
            &pct(o.playoff_pct),
            &pct(o.division_pct),
            &pct(o.wildcard_pct),
        ]));
    }

    out
}

fn projection_line(c: [&str; 10]) -> String {
    let line = format!(
        "{:<4} {:<22} {:>6} {:>6} {:>5} {:>11} {:>4} {:>4} {:>4} {:>4}",
        c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8], c[9]
    );
    format!("{}\n", line.trim_end())
}

fn odds_line(c: [&str; 5]) -> String {
    let line = format!("{:<4} {:<22} {:>8} {:>8} {:>8}", c[0], c[1], c[2], c[3], c[4]);
    format!("{}\n", line.trim_end())
}

fn pct(v: f64) -> String {
    format!("{v:.1}%")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(team: &str, avg: f64, median: f64, sd: f64, p: [f64; 4]) -> TeamProjection {
        TeamProjection {
            team: team.to_string(),
            median_wins: median,
            avg_wins: avg,
            std_dev: sd,
            p10: p[0],
            p25: p[1],
            p75: p[2],
            p90: p[3],
        }
    }

    #[test]
    fn projection_table_golden() {
        let txt = format_projection_table(&[
            projection("NYY", 88.4, 88.0, 5.9, [81.0, 84.0, 92.0, 96.0]),
            projection("TB", 81.0, 81.0, 6.0, [73.0, 77.0, 85.0, 89.0]),
        ]);
        let expected = concat!(
            "team name                     mean median    sd      90% CI  p10  p25  p75  p90\n",
            "---- ---------------------- ------ ------ ----- ----------- ---- ---- ---- ----\n",
            "NYY  New York Yankees         88.4     88  5.90   78.7-98.1   81   84   92   96\n",
            "TB   Tampa Bay Rays           81.0     81  6.00   71.1-90.9   73   77   85   89\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn playoff_odds_golden() {
        let txt = format_playoff_odds(&[
            PlayoffOdds {
                team: "BAL".to_string(),
                playoff_pct: 66.7,
                division_pct: 33.3,
                wildcard_pct: 33.3,
            },
            PlayoffOdds {
                team: "ZZZ".to_string(),
                playoff_pct: 100.0,
                division_pct: 0.0,
                wildcard_pct: 100.0,
            },
        ]);
        let expected = concat!(
            "team name                    playoff division wildcard\n",
            "---- ---------------------- -------- -------- --------\n",
            "BAL  Baltimore Orioles         66.7%    33.3%    33.3%\n",
            "ZZZ  ZZZ                      100.0%     0.0%   100.0%\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Arizona Diamondbacks", 10), "Arizona D.");
        assert_eq!(truncate("Cubs", 10), "Cubs");
    }
}
