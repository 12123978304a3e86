//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initialises logging (stderr, `RUST_LOG`-style filter)
//! - loads ambient settings from the environment
//! - parses CLI arguments and dispatches to [`pipeline`]
//! - prints reports and writes outputs

use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, SimulateArgs, SummaryArgs};
use crate::config::Settings;
use crate::domain::teams::normalize_team_code;
use crate::error::AppError;
use crate::io::export::{PlayoffOddsFile, write_playoff_odds_json, write_projections_json};
use crate::math::DiscretizedWinDistribution;

pub mod pipeline;

/// Entry point for the `pennant` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    let cli = crate::cli::Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Dist(args) => write_page(pipeline::build_dist(&args, &settings)?, &args.render.out),
        Command::Elo(args) => write_page(pipeline::build_elo(&args, &settings)?, &args.render.out),
        Command::Race(args) => write_page(pipeline::build_race(&args, &settings)?, &args.render.out),
        Command::Player(args) => write_page(pipeline::build_player(&args, &settings)?, &args.render.out),
        Command::Simulate(args) => handle_simulate(&args, &settings),
        Command::Summary(args) => handle_summary(&args, &settings),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pennant_charts=info,warn"));
    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_page(page: pipeline::ChartPage, out: &Path) -> Result<(), AppError> {
    page.write(out)?;
    println!("{}", out.display());
    Ok(())
}

fn handle_simulate(args: &SimulateArgs, settings: &Settings) -> Result<(), AppError> {
    let run = pipeline::run_simulation(args, settings)?;

    let ranked = crate::report::rank_by_mean(&run.file.projections);
    println!("{}", crate::report::format_projection_table(&ranked));

    if let Some(odds) = args.league.and_then(|league| run.odds.get(&league)) {
        println!("{}", crate::report::format_playoff_odds(odds));
    }

    write_projections_json(&args.out, &run.file)?;
    info!(path = %args.out.display(), "wrote projections");

    if let Some(path) = &args.odds_out {
        let file = PlayoffOddsFile {
            updated: run.file.updated.clone(),
            simulations: run.file.simulations,
            odds: run.odds.into_values().flatten().collect(),
        };
        write_playoff_odds_json(path, &file)?;
        info!(path = %path.display(), "wrote playoff odds");
    }

    Ok(())
}

fn handle_summary(args: &SummaryArgs, settings: &Settings) -> Result<(), AppError> {
    let projections = pipeline::load_projections(settings, &args.projections)?;
    let ranked = crate::report::rank_by_mean(&projections);
    println!("{}", crate::report::format_projection_table(&ranked));

    if let Some(team) = &args.team {
        let code = normalize_team_code(team);
        let projection = projections
            .iter()
            .find(|p| p.team == code)
            .ok_or_else(|| AppError::new(3, format!("No projection for team `{code}`.")))?;
        let dist = DiscretizedWinDistribution::from(projection);
        println!("{}", crate::plot::render_ascii_distribution(&dist, args.width, args.height));
    }

    Ok(())
}
