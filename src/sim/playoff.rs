//! Postseason odds from simulated win totals.
//!
//! Per league and per simulation: each division's best record wins it
//! (ties go to the alphabetically first club), and the next
//! [`WILD_CARDS`] records among the remaining clubs take the wild cards.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::PlayoffOdds;
use crate::domain::teams::{Division, League, team_info};
use crate::sim::season::SimulationMatrix;

pub const WILD_CARDS: usize = 3;

#[derive(Debug, Clone, Default)]
struct Counts {
    playoff: Vec<u32>,
    division: Vec<u32>,
    wildcard: Vec<u32>,
}

impl Counts {
    fn new(n: usize) -> Self {
        Self {
            playoff: vec![0; n],
            division: vec![0; n],
            wildcard: vec![0; n],
        }
    }

    fn merge(mut self, other: Counts) -> Self {
        for (a, b) in self.playoff.iter_mut().zip(other.playoff) {
            *a += b;
        }
        for (a, b) in self.division.iter_mut().zip(other.division) {
            *a += b;
        }
        for (a, b) in self.wildcard.iter_mut().zip(other.wildcard) {
            *a += b;
        }
        self
    }
}

/// Odds for every club of `league` present in the matrix, highest playoff % first.
pub fn playoff_odds(matrix: &SimulationMatrix, league: League) -> Vec<PlayoffOdds> {
    // (matrix column, division) for the league's clubs, in team-code order.
    let members: Vec<(usize, Division)> = matrix
        .teams()
        .iter()
        .enumerate()
        .filter_map(|(i, code)| {
            let info = team_info(code)?;
            (info.league == league).then_some((i, info.division))
        })
        .collect();
    let n_sims = matrix.simulations();
    if members.is_empty() || n_sims == 0 {
        return Vec::new();
    }

    let mut divisions: BTreeMap<Division, Vec<usize>> = BTreeMap::new();
    for (slot, (_, division)) in members.iter().enumerate() {
        divisions.entry(*division).or_default().push(slot);
    }

    let counts = matrix
        .rows()
        .par_iter()
        .fold(
            || Counts::new(members.len()),
            |mut acc, row| {
                let wins = |slot: usize| row[members[slot].0];
                let mut winners = vec![false; members.len()];
                for slots in divisions.values() {
                    let mut best: Option<usize> = None;
                    for &slot in slots {
                        if best.is_none_or(|b| wins(slot) > wins(b)) {
                            best = Some(slot);
                        }
                    }
                    if let Some(slot) = best {
                        winners[slot] = true;
                        acc.division[slot] += 1;
                        acc.playoff[slot] += 1;
                    }
                }
                let mut rest: Vec<usize> = (0..members.len()).filter(|s| !winners[*s]).collect();
                rest.sort_by(|a, b| wins(*b).cmp(&wins(*a)));
                for &slot in rest.iter().take(WILD_CARDS) {
                    acc.wildcard[slot] += 1;
                    acc.playoff[slot] += 1;
                }
                acc
            },
        )
        .reduce(|| Counts::new(members.len()), Counts::merge);

    let pct = |count: u32| (1000.0 * count as f64 / n_sims as f64).round() / 10.0;
    let mut odds: Vec<PlayoffOdds> = members
        .iter()
        .enumerate()
        .map(|(slot, (column, _))| PlayoffOdds {
            team: matrix.teams()[*column].clone(),
            playoff_pct: pct(counts.playoff[slot]),
            division_pct: pct(counts.division[slot]),
            wildcard_pct: pct(counts.wildcard[slot]),
        })
        .collect();
    odds.sort_by(|a, b| b.playoff_pct.total_cmp(&a.playoff_pct));
    odds
}

#[cfg(test)]
mod tests {
    use super::*;

    /// AL East + AL Central, plus one NL club that must be ignored.
    fn matrix(rows: Vec<Vec<u32>>) -> SimulationMatrix {
        let teams = ["BAL", "BOS", "CLE", "CWS", "DET", "NYY", "SEA", "TB", "TOR", "ATL"];
        SimulationMatrix::new(teams.iter().map(|t| t.to_string()).collect(), rows)
    }

    #[test]
    fn division_winner_and_wild_cards() {
        //                BAL BOS CLE CWS DET NYY SEA TB TOR ATL
        let row = vec![95, 90, 88, 60, 85, 92, 70, 84, 80, 99];
        let odds = playoff_odds(&matrix(vec![row]), League::American);
        let get = |t: &str| odds.iter().find(|o| o.team == t).unwrap();

        assert_eq!(odds.len(), 9);
        assert!(odds.iter().all(|o| o.team != "ATL"));
        assert_eq!(get("BAL").division_pct, 100.0);
        assert_eq!(get("CLE").division_pct, 100.0);
        assert_eq!(get("SEA").division_pct, 100.0);
        // Non-winners by wins: NYY 92, BOS 90, DET 85, TB 84 ...
        assert_eq!(get("NYY").wildcard_pct, 100.0);
        assert_eq!(get("BOS").wildcard_pct, 100.0);
        assert_eq!(get("DET").wildcard_pct, 100.0);
        assert_eq!(get("TB").playoff_pct, 0.0);
        assert_eq!(odds.last().map(|o| o.playoff_pct), Some(0.0));
    }

    #[test]
    fn division_tie_goes_to_first_code_and_percentages_round() {
        let tie = vec![90, 90, 80, 70, 60, 70, 75, 70, 70, 0];
        let bos = vec![80, 90, 80, 70, 60, 70, 75, 70, 70, 0];
        let odds = playoff_odds(&matrix(vec![tie.clone(), tie, bos]), League::American);
        let bal = odds.iter().find(|o| o.team == "BAL").unwrap();
        assert_eq!(bal.division_pct, 66.7);
        assert_eq!(bal.wildcard_pct, 33.3);
        assert_eq!(bal.playoff_pct, 100.0);
        let bos = odds.iter().find(|o| o.team == "BOS").unwrap();
        assert_eq!(bos.division_pct, 33.3);
        assert_eq!(bos.wildcard_pct, 66.7);
        assert_eq!(bos.playoff_pct, 100.0);
    }
}
