//! ELO win probability, game-by-game rating updates, and rating blending.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::{EloPoint, ScheduledGame};

/// Home-field advantage in rating points.
pub const HOME_FIELD_ADVANTAGE: f64 = 55.0;

/// Pull toward 50% applied to raw ELO probabilities.
pub const DEFAULT_SHRINKAGE: f64 = 0.16;

/// Games until the preseason rating no longer contributes.
pub const FADE_GAMES: u32 = 100;

/// Probability that `a` beats `b`, with `hfa` added to `a`'s rating.
pub fn expected_score(a: f64, b: f64, hfa: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((b - (a + hfa)) / 400.0))
}

/// Rating points at stake in one game before the margin multiplier.
pub const K_FACTOR: f64 = 20.0;

/// Damping constant of the margin-of-victory multiplier.
pub const MOV_MULTIPLIER: f64 = 2.2;

/// Upper bound on the margin-of-victory multiplier.
pub const MOV_CAP: f64 = 1.5;

/// `ln(|run_diff| + 1)`, damped by the pre-game rating gap and capped at [`MOV_CAP`].
pub fn margin_of_victory_mult(run_diff: f64, elo_diff: f64) -> f64 {
    let raw = (run_diff.abs() + 1.0).ln() * (MOV_MULTIPLIER / (0.001 * elo_diff.abs() + MOV_MULTIPLIER));
    raw.min(MOV_CAP)
}

/// Ratings `(home, away)` after one completed game. The exchange is zero-sum.
pub fn update_elo(home: f64, away: f64, home_score: u32, away_score: u32, hfa: f64) -> (f64, f64) {
    let expected = expected_score(home, away, hfa);
    let actual = if home_score > away_score { 1.0 } else { 0.0 };
    let mov = margin_of_victory_mult(f64::from(home_score) - f64::from(away_score), home - away);
    let shift = K_FACTOR * mov * (actual - expected);
    (home + shift, away - shift)
}

/// Replay the completed games of `schedule` in date order, starting from `initial`.
///
/// Each team gets one point per date it played, holding its rating after that
/// date's games (rounded to two decimals). Games involving a team without a
/// starting rating are skipped.
pub fn elo_history(
    schedule: &[ScheduledGame],
    initial: &BTreeMap<String, f64>,
    hfa: f64,
) -> BTreeMap<String, Vec<EloPoint>> {
    let mut games: Vec<&ScheduledGame> = schedule.iter().filter(|g| g.is_completed()).collect();
    games.sort_by_key(|g| g.date);

    let mut ratings = initial.clone();
    let mut history: BTreeMap<String, Vec<EloPoint>> = BTreeMap::new();
    for game in games {
        let (Some(&home), Some(&away)) = (ratings.get(&game.home_team), ratings.get(&game.away_team)) else {
            warn!(home = %game.home_team, away = %game.away_team, date = %game.date, "no rating; skipping game");
            continue;
        };
        let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
            continue;
        };
        let (home_post, away_post) = update_elo(home, away, home_score, away_score, hfa);
        for (team, elo) in [(&game.home_team, home_post), (&game.away_team, away_post)] {
            ratings.insert(team.clone(), elo);
            let points = history.entry(team.clone()).or_default();
            let point = EloPoint {
                date: game.date,
                elo: round2(elo),
            };
            match points.last_mut() {
                Some(last) if last.date == game.date => *last = point,
                _ => points.push(point),
            }
        }
    }
    history
}

/// Shrink a probability toward 0.5: the result lies in `[s, 1 - s]`.
pub fn apply_shrinkage(p: f64, shrinkage: f64) -> f64 {
    shrinkage + (1.0 - 2.0 * shrinkage) * p
}

/// Completed games per team (each game counts once for both clubs).
pub fn games_played(schedule: &[ScheduledGame]) -> BTreeMap<String, u32> {
    let mut out = BTreeMap::new();
    for game in schedule.iter().filter(|g| g.is_completed()) {
        *out.entry(game.home_team.clone()).or_insert(0) += 1;
        *out.entry(game.away_team.clone()).or_insert(0) += 1;
    }
    out
}

/// Blend current ratings toward the preseason baseline.
///
/// Weight on the current rating grows linearly with games played and reaches
/// 1 at `fade` games. Teams without a preseason rating keep their current one.
/// Blended values are rounded to two decimals.
pub fn regress_to_preseason(
    current: &BTreeMap<String, f64>,
    preseason: &BTreeMap<String, f64>,
    games_played: &BTreeMap<String, u32>,
    fade: u32,
) -> BTreeMap<String, f64> {
    current
        .iter()
        .map(|(team, &elo)| {
            let blended = match preseason.get(team) {
                None => elo,
                Some(&pre) => {
                    let gp = games_played.get(team).copied().unwrap_or(0) as f64;
                    let pct = if fade == 0 { 1.0 } else { (gp / fade as f64).min(1.0) };
                    round2(pct * elo + (1.0 - pct) * pre)
                }
            };
            (team.clone(), blended)
        })
        .collect()
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn equal_ratings_favor_home_side() {
        assert!((expected_score(1500.0, 1500.0, 0.0) - 0.5).abs() < 1e-12);
        let p = expected_score(1500.0, 1500.0, HOME_FIELD_ADVANTAGE);
        assert!(p > 0.57 && p < 0.58, "{p}");
        // 400 points is 10:1 odds.
        assert!((expected_score(1900.0, 1500.0, 0.0) - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn margin_multiplier_damps_favorites_and_caps_blowouts() {
        assert!((margin_of_victory_mult(3.0, 0.0) - 4f64.ln()).abs() < 1e-12);
        assert!((margin_of_victory_mult(-3.0, 100.0) - 1.326_020_693).abs() < 1e-9);
        assert_eq!(margin_of_victory_mult(10.0, 0.0), MOV_CAP);
    }

    #[test]
    fn update_is_zero_sum_and_rewards_the_winner() {
        let (home, away) = update_elo(1500.0, 1500.0, 5, 2, HOME_FIELD_ADVANTAGE);
        assert!((home - 1511.686_551_5).abs() < 1e-6, "{home}");
        assert!((home + away - 3000.0).abs() < 1e-9);

        let (home, away) = update_elo(1500.0, 1500.0, 2, 3, HOME_FIELD_ADVANTAGE);
        assert!((home - 1491.980_332_1).abs() < 1e-6, "{home}");
        assert!(away > 1500.0);

        let (home, _) = update_elo(1500.0, 1500.0, 10, 0, HOME_FIELD_ADVANTAGE);
        assert!((home - 1512.645_097_4).abs() < 1e-6, "{home}");
    }

    #[test]
    fn history_replays_completed_games_in_date_order() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 4, d).unwrap();
        let game = |d: u32, h: &str, a: &str, score: Option<(u32, u32)>| ScheduledGame {
            date: day(d),
            home_team: h.into(),
            away_team: a.into(),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
        };
        let schedule = [
            game(2, "BOS", "NYY", Some((4, 1))),
            game(1, "NYY", "BOS", Some((5, 2))),
            game(3, "NYY", "BOS", None),
            game(3, "SEA", "NYY", Some((1, 0))),
        ];
        let initial = BTreeMap::from([("NYY".to_string(), 1500.0), ("BOS".to_string(), 1500.0)]);

        let history = elo_history(&schedule, &initial, HOME_FIELD_ADVANTAGE);
        assert_eq!(history.len(), 2);
        let nyy: Vec<(NaiveDate, f64)> = history["NYY"].iter().map(|p| (p.date, p.elo)).collect();
        assert_eq!(nyy, vec![(day(1), 1511.69), (day(2), 1499.21)]);
        let bos: Vec<(NaiveDate, f64)> = history["BOS"].iter().map(|p| (p.date, p.elo)).collect();
        assert_eq!(bos, vec![(day(1), 1488.31), (day(2), 1500.79)]);
    }

    #[test]
    fn doubleheader_keeps_one_point_per_date() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let game = |h: u32, a: u32| ScheduledGame {
            date: day,
            home_team: "NYY".into(),
            away_team: "BOS".into(),
            home_score: Some(h),
            away_score: Some(a),
        };
        let initial = BTreeMap::from([("NYY".to_string(), 1500.0), ("BOS".to_string(), 1500.0)]);
        let history = elo_history(&[game(5, 2), game(1, 3)], &initial, HOME_FIELD_ADVANTAGE);
        assert_eq!(history["NYY"].len(), 1);
        let (h1, a1) = update_elo(1500.0, 1500.0, 5, 2, HOME_FIELD_ADVANTAGE);
        let (h2, _) = update_elo(h1, a1, 1, 3, HOME_FIELD_ADVANTAGE);
        assert_eq!(history["NYY"][0].elo, round2(h2));
    }

    #[test]
    fn shrinkage_pulls_toward_even() {
        assert!((apply_shrinkage(0.70, 0.16) - 0.636).abs() < 1e-9);
        assert!((apply_shrinkage(0.30, 0.16) - 0.364).abs() < 1e-9);
        assert!((apply_shrinkage(0.5, 0.16) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn regression_fades_with_games_played() {
        let current = BTreeMap::from([
            ("BAL".to_string(), 1540.0),
            ("NYY".to_string(), 1520.0),
            ("SEA".to_string(), 1490.0),
        ]);
        let preseason = BTreeMap::from([("BAL".to_string(), 1500.0), ("NYY".to_string(), 1560.0)]);
        let gp = BTreeMap::from([("BAL".to_string(), 25), ("NYY".to_string(), 140)]);

        let out = regress_to_preseason(&current, &preseason, &gp, FADE_GAMES);
        assert_eq!(out["BAL"], 1510.0);
        assert_eq!(out["NYY"], 1520.0);
        assert_eq!(out["SEA"], 1490.0);
    }

    #[test]
    fn games_played_counts_completed_only() {
        let d = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let game = |h: &str, a: &str, score: Option<(u32, u32)>| ScheduledGame {
            date: d,
            home_team: h.into(),
            away_team: a.into(),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
        };
        let gp = games_played(&[
            game("NYY", "BOS", Some((3, 1))),
            game("BOS", "NYY", None),
            game("BOS", "TB", Some((0, 2))),
        ]);
        assert_eq!(gp["BOS"], 2);
        assert_eq!(gp["NYY"], 1);
        assert_eq!(gp["TB"], 1);
    }
}
