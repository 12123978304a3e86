//! ASCII histogram of a discretized win distribution.
//!
//! Fixed-size grid, deterministic output (golden-testable):
//! - bars: `#`
//! - the column holding the rounded mean: `@`
//!
//! Columns split the win domain evenly. When there are fewer columns than win
//! totals, a column shows the tallest bar it covers.

use crate::math::DiscretizedWinDistribution;

pub fn render_ascii_distribution(dist: &DiscretizedWinDistribution, width: usize, height: usize) -> String {
    let Some((lo, hi)) = dist.domain() else {
        return format!("Wins: {} (no distribution)\n", dist.team);
    };
    let width = width.max(5);
    let height = height.max(3);
    let bins = dist.bins.len();
    let max_density = dist.max_density();

    let mean_index = (dist.mean.round() as i64 - lo as i64).clamp(0, bins as i64 - 1) as usize;

    let mut columns = Vec::with_capacity(width);
    for c in 0..width {
        let (start, end) = column_range(c, width, bins);
        let bar = dist.bins[start..end]
            .iter()
            .map(|b| bar_height(b.density, b.frequency, max_density, height))
            .max()
            .unwrap_or(0);
        let ch = if (start..end).contains(&mean_index) { '@' } else { '#' };
        columns.push((bar, ch));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Wins: {} mean={:.1} sd={:.2} | wins=[{lo}, {hi}]\n",
        dist.team, dist.mean, dist.std_dev
    ));

    for row in 0..height {
        // Row 0 is the top; a bar of height h fills the bottom h rows.
        let line: String = columns
            .iter()
            .map(|&(bar, ch)| if bar >= height - row { ch } else { ' ' })
            .collect();
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&axis_line(lo, hi, width));
    out.push('\n');
    out
}

/// Bin indices `[start, end)` drawn in column `c`; never empty.
fn column_range(c: usize, width: usize, bins: usize) -> (usize, usize) {
    let start = (c * bins / width).min(bins - 1);
    let end = ((c + 1) * bins / width).clamp(start + 1, bins);
    (start, end)
}

fn bar_height(density: f64, frequency: u32, max_density: f64, height: usize) -> usize {
    if max_density <= 0.0 || !density.is_finite() {
        return 0;
    }
    let h = ((density / max_density) * height as f64).round() as usize;
    // A tail that still shows up in the simulations keeps a visible stub.
    if frequency > 0 { h.clamp(1, height) } else { h.min(height) }
}

fn axis_line(lo: i32, hi: i32, width: usize) -> String {
    let lo = lo.to_string();
    let hi = hi.to_string();
    let gap = width.saturating_sub(lo.len() + hi.len()).max(1);
    format!("{lo}{}{hi}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{WinBin, discretize};

    fn small_dist() -> DiscretizedWinDistribution {
        let densities = [0.1, 0.2, 0.4, 0.2, 0.1];
        DiscretizedWinDistribution {
            team: "NYY".to_string(),
            mean: 82.0,
            std_dev: 1.0,
            bins: densities
                .iter()
                .enumerate()
                .map(|(i, &density)| WinBin {
                    wins: 80 + i as i32,
                    density,
                    frequency: (density * 10_000.0).round() as u32,
                })
                .collect(),
        }
    }

    #[test]
    fn histogram_golden_snapshot_small() {
        let txt = render_ascii_distribution(&small_dist(), 5, 4);
        let expected = concat!(
            "Wins: NYY mean=82.0 sd=1.00 | wins=[80, 84]\n",
            "  @  \n",
            "  @  \n",
            " #@# \n",
            "##@##\n",
            "80 84\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn wide_plot_repeats_columns() {
        let txt = render_ascii_distribution(&small_dist(), 10, 4);
        let lines: Vec<_> = txt.lines().collect();
        assert_eq!(lines[1], "    @@    ");
        assert_eq!(lines[4], "####@@####");
        assert_eq!(lines[5], "80      84");
    }

    #[test]
    fn narrow_plot_keeps_peak() {
        let dist = discretize("SEA", 86.0, 6.0, 10_000);
        let txt = render_ascii_distribution(&dist, 10, 6);
        let lines: Vec<_> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 6 + 1);
        // The tallest column reaches the top row and carries the mean marker.
        assert!(lines[1].contains('@'));
        assert!(lines[6].chars().all(|c| c == '#' || c == '@'));
    }

    #[test]
    fn empty_distribution_has_one_line() {
        let dist = discretize("XXX", f64::NAN, 5.0, 10_000);
        assert_eq!(render_ascii_distribution(&dist, 40, 10), "Wins: XXX (no distribution)\n");
    }
}
