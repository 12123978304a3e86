//! Command-line parsing for `pennant`.
//!
//! Argument parsing stays here; dispatch and side effects live in
//! [`crate::app`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::charts::metrics::MetricKey;
use crate::domain::OddsMetric;
use crate::domain::teams::League;
use crate::render::theme::ThemeMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pennant", version, about = "MLB projection charts and season simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Projected win distribution (bars for one or two teams, curves for more).
    Dist(DistArgs),
    /// ELO rating trend for one season.
    Elo(EloArgs),
    /// Playoff odds over the season.
    Race(RaceArgs),
    /// A player's season-by-season stats.
    Player(PlayerArgs),
    /// Simulate the rest of the season from a schedule and ELO ratings.
    Simulate(SimulateArgs),
    /// Print a projection table (and optionally one team's distribution).
    Summary(SummaryArgs),
}

/// Options shared by every chart command.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Snapshot location: file path, `-` for stdin, or an http(s) URL.
    pub input: String,

    /// Output HTML page.
    #[arg(short, long, default_value = "chart.html")]
    pub out: PathBuf,

    /// Color theme (defaults to PENNANT_THEME, then light).
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Skip entrance animations.
    #[arg(long)]
    pub reduced_motion: bool,

    /// Container width in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    pub container_width: f64,

    /// Snapshot the hovered state at this container x (CSS pixels).
    #[arg(long, requires = "hover_y")]
    pub hover_x: Option<f64>,

    /// Container y for the hover snapshot.
    #[arg(long, requires = "hover_x")]
    pub hover_y: Option<f64>,

    /// Chart title.
    #[arg(long)]
    pub title: Option<String>,

    /// Team codes, comma-separated (default: every team in the snapshot).
    #[arg(long, value_delimiter = ',')]
    pub teams: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DistArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Shorter chart for sidebars.
    #[arg(long)]
    pub compact: bool,

    /// Previous projections snapshot, for the change callout.
    #[arg(long)]
    pub previous: Option<String>,

    /// Snapshot date shown in the footnote.
    #[arg(long)]
    pub updated: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct EloArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Season to plot (default: the latest season in the snapshot).
    #[arg(long)]
    pub season: Option<i32>,

    /// Replay this schedule instead; INPUT then holds the starting ratings (`team,elo`).
    #[arg(long)]
    pub schedule: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RaceArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Which odds series to plot.
    #[arg(long, value_enum, default_value_t = OddsMetric::Playoff)]
    pub metric: OddsMetric,
}

#[derive(Debug, Args, Clone)]
pub struct PlayerArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Metrics to plot, comma-separated.
    #[arg(long, value_enum, value_delimiter = ',', default_value = "home_runs")]
    pub metrics: Vec<MetricKey>,

    /// Player name for the tooltip heading.
    #[arg(long)]
    pub player: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Schedule CSV (date, homeTeam, awayTeam, homeScore, awayScore).
    pub schedule: String,

    /// Current ELO ratings (CSV `team,elo` or a JSON map).
    pub ratings: String,

    /// Preseason ratings to blend toward early in the season.
    #[arg(long)]
    pub preseason: Option<String>,

    /// Number of simulated seasons.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub simulations: usize,

    /// Random seed (defaults to PENNANT_SIM_SEED, then a fixed seed).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Projections JSON output.
    #[arg(short, long, default_value = "projections.json")]
    pub out: PathBuf,

    /// Also write playoff odds for both leagues to this JSON file.
    #[arg(long)]
    pub odds_out: Option<PathBuf>,

    /// Print playoff odds for one league.
    #[arg(long, value_enum)]
    pub league: Option<League>,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    /// Projections snapshot location.
    pub projections: String,

    /// Also plot this team's win distribution.
    #[arg(long)]
    pub team: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dist_with_shared_flags() {
        let cli = Cli::try_parse_from([
            "pennant",
            "dist",
            "projections.json",
            "--teams",
            "NYY,BOS",
            "--theme",
            "dark",
            "--hover-x",
            "300",
            "--hover-y",
            "120",
            "--compact",
        ])
        .unwrap();
        let Command::Dist(args) = cli.command else {
            panic!("expected dist");
        };
        assert_eq!(args.render.teams, ["NYY", "BOS"]);
        assert_eq!(args.render.theme, Some(ThemeMode::Dark));
        assert_eq!(args.render.hover_x, Some(300.0));
        assert_eq!(args.render.out, PathBuf::from("chart.html"));
        assert!(args.compact);
    }

    #[test]
    fn hover_needs_both_coordinates() {
        assert!(Cli::try_parse_from(["pennant", "elo", "elo.json", "--hover-x", "10"]).is_err());
    }

    #[test]
    fn player_metrics_are_comma_separated() {
        let cli = Cli::try_parse_from(["pennant", "player", "judge.csv", "--metrics", "home_runs,ops"]).unwrap();
        let Command::Player(args) = cli.command else {
            panic!("expected player");
        };
        assert_eq!(args.metrics, [MetricKey::HomeRuns, MetricKey::Ops]);
    }

    #[test]
    fn simulate_defaults() {
        let cli = Cli::try_parse_from(["pennant", "simulate", "schedule.csv", "ratings.csv", "--league", "AL"]).unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.simulations, 10_000);
        assert_eq!(args.seed, None);
        assert_eq!(args.league, Some(League::American));
    }
}
