//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - snapshot rows (`TeamProjection`, `EloPoint`, `PlayoffOddsPoint`, `PlayerSeasonStats`)
//! - simulator inputs/outputs (`ScheduledGame`, `PlayoffOdds`)
//! - the club registry (`teams`)

pub mod teams;
pub mod types;

pub use types::*;
