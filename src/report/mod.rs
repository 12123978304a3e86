//! Reporting utilities: projection rankings and formatted terminal tables.

use std::cmp::Ordering;

use crate::domain::TeamProjection;

pub mod format;

pub use format::*;

/// Projections ordered by mean wins, best first; ties fall back to team code.
pub fn rank_by_mean(projections: &[TeamProjection]) -> Vec<TeamProjection> {
    let mut sorted = projections.to_vec();
    sorted.sort_by(|a, b| {
        b.avg_wins
            .partial_cmp(&a.avg_wins)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(team: &str, avg: f64) -> TeamProjection {
        TeamProjection {
            team: team.to_string(),
            median_wins: avg.trunc(),
            avg_wins: avg,
            std_dev: 5.0,
            p10: avg - 6.0,
            p25: avg - 3.0,
            p75: avg + 3.0,
            p90: avg + 6.0,
        }
    }

    #[test]
    fn rank_by_mean_orders_descending_with_code_tiebreak() {
        let ranked = rank_by_mean(&[
            projection("TB", 81.0),
            projection("NYY", 92.5),
            projection("BOS", 81.0),
        ]);
        let codes: Vec<_> = ranked.iter().map(|p| p.team.as_str()).collect();
        assert_eq!(codes, ["NYY", "BOS", "TB"]);
    }
}
