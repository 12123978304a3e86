//! `pennant-charts` library crate.
//!
//! The binary (`pennant`) is a thin wrapper around this library so that:
//!
//! - renderers and the simulator are testable without spawning processes
//! - charts render into an in-memory [`render::dom::Container`], so hover
//!   behavior can be driven and inspected from tests
//! - the same code backs the CLI, the HTML export, and the terminal reports

pub mod app;
pub mod charts;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod render;
pub mod report;
pub mod sim;
