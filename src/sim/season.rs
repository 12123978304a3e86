//! Monte Carlo season simulation.
//!
//! Completed games count as-is. Every remaining game between two rated teams
//! is drawn independently per simulation with the shrunk ELO probability of a
//! home win. Games involving an unrated team are skipped (neither side gets
//! the win), matching how the published projections treat them.
//!
//! Each simulation owns its RNG, seeded `seed + index`, so results do not
//! depend on how Rayon splits the work.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Distribution};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::ScheduledGame;
use crate::error::AppError;
use crate::math::SIMULATION_COUNT;
use crate::sim::elo::{DEFAULT_SHRINKAGE, HOME_FIELD_ADVANTAGE, apply_shrinkage, expected_score};

pub const DEFAULT_SEED: u64 = 20_260_101;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub simulations: usize,
    pub seed: u64,
    pub hfa: f64,
    pub shrinkage: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulations: SIMULATION_COUNT as usize,
            seed: DEFAULT_SEED,
            hfa: HOME_FIELD_ADVANTAGE,
            shrinkage: DEFAULT_SHRINKAGE,
        }
    }
}

/// Final win totals: one row per simulation, one column per team.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationMatrix {
    teams: Vec<String>,
    rows: Vec<Vec<u32>>,
}

impl SimulationMatrix {
    pub fn new(teams: Vec<String>, rows: Vec<Vec<u32>>) -> Self {
        Self { teams, rows }
    }

    /// Team codes, sorted.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn simulations(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    pub fn team_index(&self, team: &str) -> Option<usize> {
        self.teams.iter().position(|t| t == team)
    }

    /// Every simulation's win total for the team at `index`.
    pub fn column(&self, index: usize) -> Vec<u32> {
        self.rows.iter().filter_map(|row| row.get(index).copied()).collect()
    }
}

struct RemainingGame {
    home: usize,
    away: usize,
    home_win: Bernoulli,
}

pub fn simulate_season(
    schedule: &[ScheduledGame],
    ratings: &BTreeMap<String, f64>,
    config: &SimConfig,
) -> Result<SimulationMatrix, AppError> {
    if config.simulations == 0 {
        return Err(AppError::new(2, "Simulation count must be > 0."));
    }
    if !(0.0..0.5).contains(&config.shrinkage) {
        return Err(AppError::new(2, "Shrinkage must be in [0, 0.5)."));
    }
    if !config.hfa.is_finite() {
        return Err(AppError::new(2, "Home-field advantage must be finite."));
    }

    let mut teams: Vec<String> = schedule
        .iter()
        .flat_map(|g| [g.home_team.clone(), g.away_team.clone()])
        .collect();
    teams.sort();
    teams.dedup();
    if teams.is_empty() {
        return Err(AppError::new(3, "Schedule contains no games."));
    }
    let index: BTreeMap<&str, usize> = teams.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

    let mut base = vec![0u32; teams.len()];
    let mut remaining = Vec::new();
    let mut skipped = 0usize;
    for game in schedule {
        let (home, away) = (index[game.home_team.as_str()], index[game.away_team.as_str()]);
        match (game.home_score, game.away_score) {
            // Ties never happen in MLB; a tied row credits the visitor.
            (Some(h), Some(a)) => {
                let winner = if h > a { home } else { away };
                base[winner] += 1;
            }
            _ => {
                let (Some(&home_elo), Some(&away_elo)) = (ratings.get(&game.home_team), ratings.get(&game.away_team))
                else {
                    skipped += 1;
                    continue;
                };
                let p = apply_shrinkage(expected_score(home_elo, away_elo, config.hfa), config.shrinkage);
                let home_win = Bernoulli::new(p).map_err(|e| {
                    AppError::new(
                        4,
                        format!("Invalid win probability for {} vs {}: {e}", game.home_team, game.away_team),
                    )
                })?;
                remaining.push(RemainingGame { home, away, home_win });
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, "remaining games without ratings for both teams");
    }
    info!(
        teams = teams.len(),
        remaining = remaining.len(),
        simulations = config.simulations,
        seed = config.seed,
        "simulating season"
    );

    let rows: Vec<Vec<u32>> = (0..config.simulations)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let mut wins = base.clone();
            for game in &remaining {
                if game.home_win.sample(&mut rng) {
                    wins[game.home] += 1;
                } else {
                    wins[game.away] += 1;
                }
            }
            wins
        })
        .collect();

    Ok(SimulationMatrix::new(teams, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(h: &str, a: &str, score: Option<(u32, u32)>) -> ScheduledGame {
        ScheduledGame {
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            home_team: h.into(),
            away_team: a.into(),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
        }
    }

    fn ratings() -> BTreeMap<String, f64> {
        BTreeMap::from([("BOS".to_string(), 1480.0), ("NYY".to_string(), 1540.0)])
    }

    fn config(simulations: usize) -> SimConfig {
        SimConfig {
            simulations,
            ..SimConfig::default()
        }
    }

    #[test]
    fn completed_games_seed_every_simulation() {
        let schedule = vec![game("NYY", "BOS", Some((4, 2))), game("BOS", "NYY", Some((5, 1)))];
        let m = simulate_season(&schedule, &ratings(), &config(50)).unwrap();
        assert_eq!(m.teams(), ["BOS", "NYY"]);
        assert!(m.rows().iter().all(|r| r == &vec![1, 1]));
    }

    #[test]
    fn remaining_games_add_exactly_one_win() {
        let schedule: Vec<_> = (0..20).map(|_| game("NYY", "BOS", None)).collect();
        let m = simulate_season(&schedule, &ratings(), &config(500)).unwrap();
        assert!(m.rows().iter().all(|r| r[0] + r[1] == 20));
        let nyy = m.column(1);
        let mean = nyy.iter().map(|w| *w as f64).sum::<f64>() / nyy.len() as f64;
        // raw p(NYY at home) ≈ 0.66, shrunk ≈ 0.61
        assert!(mean > 11.5 && mean < 12.9, "{mean}");
    }

    #[test]
    fn unrated_teams_are_skipped() {
        let schedule = vec![game("NYY", "SEA", None), game("SEA", "BOS", Some((3, 2)))];
        let m = simulate_season(&schedule, &ratings(), &config(10)).unwrap();
        let sea = m.team_index("SEA").unwrap();
        let nyy = m.team_index("NYY").unwrap();
        assert!(m.rows().iter().all(|r| r[sea] == 1 && r[nyy] == 0));
    }

    #[test]
    fn deterministic_for_a_seed() {
        let schedule: Vec<_> = (0..30).map(|_| game("BOS", "NYY", None)).collect();
        let a = simulate_season(&schedule, &ratings(), &config(200)).unwrap();
        let b = simulate_season(&schedule, &ratings(), &config(200)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_config_and_empty_schedule() {
        assert_eq!(simulate_season(&[], &ratings(), &config(10)).unwrap_err().exit_code(), 3);
        let schedule = vec![game("NYY", "BOS", None)];
        assert_eq!(simulate_season(&schedule, &ratings(), &config(0)).unwrap_err().exit_code(), 2);
        let bad = SimConfig {
            shrinkage: 0.5,
            ..config(10)
        };
        assert_eq!(simulate_season(&schedule, &ratings(), &bad).unwrap_err().exit_code(), 2);
    }
}
