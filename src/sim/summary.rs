//! Per-team summary statistics over a simulation matrix.

use tracing::debug;

use crate::domain::TeamProjection;
use crate::sim::elo::round2;
use crate::sim::season::SimulationMatrix;

/// Linear-interpolated percentile (`q` in 0..=100) of ascending `sorted`.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (q / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(last);
    let frac = rank - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Mean of the two middle values for even lengths.
pub fn median(sorted: &[f64]) -> Option<f64> {
    percentile(sorted, 50.0)
}

/// Summaries in matrix team order.
///
/// `avg_wins` and `std_dev` (population) are rounded to two decimals; the
/// median and percentiles are truncated to whole wins.
pub fn summarize(matrix: &SimulationMatrix) -> Vec<TeamProjection> {
    matrix
        .teams()
        .iter()
        .enumerate()
        .filter_map(|(i, team)| {
            let mut wins: Vec<f64> = matrix.column(i).into_iter().map(f64::from).collect();
            if wins.is_empty() {
                return None;
            }
            wins.sort_by(f64::total_cmp);
            let n = wins.len() as f64;
            let mean = wins.iter().sum::<f64>() / n;
            let variance = wins.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;
            let pct = |q: f64| percentile(&wins, q).unwrap_or(mean).trunc();

            let projection = TeamProjection {
                team: team.clone(),
                median_wins: median(&wins).unwrap_or(mean).trunc(),
                avg_wins: round2(mean),
                std_dev: round2(variance.sqrt()),
                p10: pct(10.0),
                p25: pct(25.0),
                p75: pct(75.0),
                p90: pct(90.0),
            };
            debug!(team = %team, avg = projection.avg_wins, sd = projection.std_dev, "summarized");
            Some(projection)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let v = [80.0, 84.0, 90.0, 92.0];
        assert_eq!(percentile(&v, 0.0), Some(80.0));
        assert_eq!(percentile(&v, 100.0), Some(92.0));
        // rank 0.3 -> 80 + 0.3 * 4
        assert!((percentile(&v, 10.0).unwrap() - 81.2).abs() < 1e-9);
        assert_eq!(median(&v), Some(87.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn summary_rounds_and_truncates() {
        let rows = [88, 91, 85, 93, 90].iter().map(|w| vec![*w, 70]).collect();
        let m = SimulationMatrix::new(vec!["BAL".into(), "COL".into()], rows);
        let s = summarize(&m);

        assert_eq!(s.len(), 2);
        let bal = &s[0];
        assert_eq!(bal.team, "BAL");
        assert_eq!(bal.avg_wins, 89.4);
        assert_eq!(bal.median_wins, 90.0);
        // population sd of [85, 88, 90, 91, 93]
        assert_eq!(bal.std_dev, 2.73);
        // rank 0.4 -> 85 + 0.4 * 3 = 86.2
        assert_eq!(bal.p10, 86.0);
        assert_eq!(bal.p90, 92.0);

        assert_eq!(s[1].std_dev, 0.0);
        assert_eq!(s[1].p25, 70.0);
    }
}
