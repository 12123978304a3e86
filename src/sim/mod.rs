//! Season simulation: ELO game probabilities, Monte Carlo win totals, and the
//! summaries the charts consume.
//!
//! ```text
//! schedule + ratings -> simulate_season -> SimulationMatrix
//!                                            |-> summarize     -> Vec<TeamProjection>
//!                                            '-> playoff_odds  -> Vec<PlayoffOdds>
//! ```

pub mod elo;
pub mod playoff;
pub mod season;
pub mod summary;

pub use playoff::playoff_odds;
pub use season::{SimConfig, SimulationMatrix, simulate_season};
pub use summary::summarize;
