//! Discretized normal model of a team's season win total.
//!
//! A projection `(mean, sd)` becomes a probability mass over integer win
//! totals by **point-sampling** the normal density at each integer:
//!
//! ```text
//! p(w) ≈ φ((w − mean) / sd) / sd
//! ```
//!
//! This is not the binned integral over `[w − 0.5, w + 0.5]`. The two agree to
//! within a fraction of a percent for realistic spreads, and the published
//! "frequency out of N simulations" figures are calibrated against the point
//! sample, so it stays.

use std::f64::consts::PI;

use tracing::warn;

use crate::domain::TeamProjection;

/// Simulations per season; the scale for frequency figures.
pub const SIMULATION_COUNT: u32 = 10_000;

/// Plausible win range for a 162-game season; the x-domain never leaves it.
pub const SEASON_MIN_WINS: i32 = 40;
pub const SEASON_MAX_WINS: i32 = 120;

/// Floor applied to a non-positive or non-finite standard deviation.
pub const MIN_STD_DEV: f64 = 0.5;

pub fn normal_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    (-0.5 * z * z).exp() / (sd * (2.0 * PI).sqrt())
}

/// Probability mass assigned to `wins` (point sample of the density).
pub fn win_probability(wins: i32, mean: f64, sd: f64) -> f64 {
    normal_pdf(wins as f64, mean, sd)
}

pub fn density_to_frequency(density: f64, n: u32) -> u32 {
    let f = (density * n as f64).round();
    if f.is_finite() && f > 0.0 { f as u32 } else { 0 }
}

/// `[max(40, floor(mean − 3sd)), min(120, ceil(mean + 3sd))]`.
pub fn win_domain(mean: f64, sd: f64) -> (i32, i32) {
    let lo = (mean - 3.0 * sd).floor();
    let hi = (mean + 3.0 * sd).ceil();
    if !(lo.is_finite() && hi.is_finite()) {
        return (SEASON_MIN_WINS, SEASON_MIN_WINS - 1);
    }
    (
        (lo as i32).max(SEASON_MIN_WINS),
        (hi as i32).min(SEASON_MAX_WINS),
    )
}

/// Replace an unusable standard deviation with [`MIN_STD_DEV`].
pub fn sanitize_std_dev(team: &str, sd: f64) -> f64 {
    if sd.is_finite() && sd > 0.0 {
        sd
    } else {
        warn!(team, std_dev = sd, floor = MIN_STD_DEV, "invalid std_dev; clamping");
        MIN_STD_DEV
    }
}

/// Coverage of the shaded confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    Ninety,
    NinetyFive,
}

impl ConfidenceLevel {
    pub fn z(self) -> f64 {
        match self {
            ConfidenceLevel::Ninety => 1.645,
            ConfidenceLevel::NinetyFive => 1.96,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::Ninety => "90%",
            ConfidenceLevel::NinetyFive => "95%",
        }
    }

    pub fn interval(self, mean: f64, sd: f64) -> (f64, f64) {
        let half = self.z() * sd;
        (mean - half, mean + half)
    }
}

/// The band every chart and report draws.
pub const CONFIDENCE_LEVEL: ConfidenceLevel = ConfidenceLevel::Ninety;

pub fn confidence_interval(mean: f64, sd: f64) -> (f64, f64) {
    CONFIDENCE_LEVEL.interval(mean, sd)
}

/// Which number the highlighted bar and the callout represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEstimate {
    /// `round(avg_wins)`.
    RoundedMean,
    /// The simulated median.
    Median,
}

impl PointEstimate {
    pub fn of(self, projection: &TeamProjection) -> i32 {
        match self {
            PointEstimate::RoundedMean => projection.avg_wins.round() as i32,
            PointEstimate::Median => projection.median_wins.round() as i32,
        }
    }
}

pub const POINT_ESTIMATE: PointEstimate = PointEstimate::RoundedMean;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinBin {
    pub wins: i32,
    pub density: f64,
    pub frequency: u32,
}

/// Per-render probability mass for one team. Never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretizedWinDistribution {
    pub team: String,
    pub mean: f64,
    pub std_dev: f64,
    pub bins: Vec<WinBin>,
}

impl DiscretizedWinDistribution {
    pub fn frequency_at(&self, wins: i32) -> Option<u32> {
        self.bin(wins).map(|b| b.frequency)
    }

    pub fn bin(&self, wins: i32) -> Option<&WinBin> {
        let first = self.bins.first()?.wins;
        let idx = usize::try_from(wins - first).ok()?;
        self.bins.get(idx)
    }

    pub fn max_density(&self) -> f64 {
        self.bins.iter().map(|b| b.density).fold(0.0, f64::max)
    }

    pub fn domain(&self) -> Option<(i32, i32)> {
        Some((self.bins.first()?.wins, self.bins.last()?.wins))
    }
}

/// Discretize `(mean, sd)` over its clamped ±3σ domain.
pub fn discretize(team: &str, mean: f64, sd: f64, n: u32) -> DiscretizedWinDistribution {
    let sd = sanitize_std_dev(team, sd);
    let bins = if mean.is_finite() {
        let (lo, hi) = win_domain(mean, sd);
        (lo..=hi)
            .map(|wins| {
                let density = win_probability(wins, mean, sd);
                WinBin {
                    wins,
                    density,
                    frequency: density_to_frequency(density, n),
                }
            })
            .collect()
    } else {
        warn!(team, "non-finite mean wins; no distribution");
        Vec::new()
    };
    DiscretizedWinDistribution {
        team: team.to_string(),
        mean,
        std_dev: sd,
        bins,
    }
}

impl From<&TeamProjection> for DiscretizedWinDistribution {
    fn from(p: &TeamProjection) -> Self {
        discretize(&p.team, p.avg_wins, p.std_dev, SIMULATION_COUNT)
    }
}

/// `frequency / n` as a one-decimal percentage string.
pub fn format_share(frequency: u32, n: u32) -> String {
    if n == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", frequency as f64 / n as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_sampled_mass_is_close_to_one() {
        for &(mean, sd) in &[(81.0_f64, 3.0_f64), (91.0, 6.0), (77.3, 8.2), (85.5, 12.0)] {
            let lo = (mean - 3.0 * sd).ceil() as i32;
            let hi = (mean + 3.0 * sd).floor() as i32;
            let total: f64 = (lo..=hi).map(|w| win_probability(w, mean, sd)).sum();
            assert!((total - 1.0).abs() < 0.05, "mean={mean} sd={sd} total={total}");
        }
    }

    #[test]
    fn frequency_is_monotone_and_bounded() {
        let mut prev = 0;
        for i in 0..=100 {
            let d = i as f64 / 100.0;
            let f = density_to_frequency(d, SIMULATION_COUNT);
            assert!(f >= prev);
            assert!(f <= SIMULATION_COUNT);
            prev = f;
        }
    }

    #[test]
    fn domain_for_91_and_6() {
        assert_eq!(win_domain(91.0, 6.0), (73, 109));
    }

    #[test]
    fn domain_clamps_to_season_range() {
        assert_eq!(win_domain(45.0, 5.0), (40, 60));
        assert_eq!(win_domain(115.0, 5.0), (100, 120));
    }

    #[test]
    fn zero_std_dev_is_clamped_not_nan() {
        let dist = discretize("COL", 60.0, 0.0, SIMULATION_COUNT);
        assert_eq!(dist.std_dev, MIN_STD_DEV);
        assert_eq!(dist.domain(), Some((58, 62)));
        assert!(dist.bins.iter().all(|b| b.density.is_finite()));
    }

    #[test]
    fn frequencies_match_rounded_density() {
        let dist = discretize("NYY", 91.0, 6.0, SIMULATION_COUNT);
        let peak = dist.bin(91).copied().unwrap();
        // φ(0) / 6 = 0.066490...
        assert!((peak.density - 0.0664904).abs() < 1e-6);
        assert_eq!(peak.frequency, 665);
        assert_eq!(dist.frequency_at(73), Some(density_to_frequency(win_probability(73, 91.0, 6.0), 10_000)));
        assert_eq!(dist.frequency_at(72), None);
    }

    #[test]
    fn ninety_percent_band() {
        let (lo, hi) = confidence_interval(91.0, 6.0);
        assert!((lo - 81.13).abs() < 1e-9);
        assert!((hi - 100.87).abs() < 1e-9);
    }

    #[test]
    fn point_estimate_rounds_mean() {
        let p = TeamProjection {
            team: "NYY".into(),
            median_wins: 90.0,
            avg_wins: 90.6,
            std_dev: 6.0,
            p10: 83.0,
            p25: 86.0,
            p75: 95.0,
            p90: 98.0,
        };
        assert_eq!(POINT_ESTIMATE.of(&p), 91);
        assert_eq!(PointEstimate::Median.of(&p), 90);
    }
}
