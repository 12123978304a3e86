//! Shared pipelines behind the CLI commands.
//!
//! Chart commands: snapshot -> parse -> render into a [`Container`] ->
//! optional hover snapshot -> HTML page.
//!
//! `simulate`: schedule + ratings -> (preseason blend) -> Monte Carlo ->
//! projections and playoff odds.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Datelike;
use tracing::{debug, info};

use crate::charts::{
    EloConfig, PlayerChartConfig, RaceConfig, VIEW_WIDTH, WinDistConfig, render_elo_trend, render_player_stats,
    render_playoff_race, render_win_distribution,
};
use crate::cli::{DistArgs, EloArgs, PlayerArgs, RaceArgs, RenderArgs, SimulateArgs};
use crate::config::Settings;
use crate::domain::teams::League;
use crate::domain::{PlayoffOdds, TeamProjection};
use crate::error::AppError;
use crate::io::export::{ProjectionsFile, write_chart_html};
use crate::io::fetch::{Snapshot, read_snapshot};
use crate::io::ingest::{
    parse_elo_history, parse_player_stats, parse_playoff_history, parse_projections, parse_ratings, parse_schedule,
};
use crate::math::POINT_ESTIMATE;
use crate::render::dom::Container;
use crate::render::theme::{ColorTheme, RenderContext};
use crate::sim::elo::{FADE_GAMES, HOME_FIELD_ADVANTAGE, elo_history, games_played, regress_to_preseason};
use crate::sim::season::DEFAULT_SEED;
use crate::sim::{SimConfig, playoff_odds, simulate_season, summarize};

/// A rendered chart ready to be written out.
pub struct ChartPage {
    pub title: String,
    pub container: Container,
    pub theme: ColorTheme,
}

impl ChartPage {
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        write_chart_html(path, &self.title, &self.container, &self.theme)?;
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }
}

/// Everything `pennant simulate` produces.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub file: ProjectionsFile,
    /// American League first, then National; each sorted by playoff odds.
    pub odds: BTreeMap<League, Vec<PlayoffOdds>>,
}

/// Fetch a snapshot, resolving relative names against `PENNANT_DATA_URL`.
pub fn load_snapshot(settings: &Settings, location: &str) -> Result<Snapshot, AppError> {
    let resolved = settings.resolve_location(location);
    let snap = read_snapshot(&resolved)?;
    debug!(location = %resolved, format = ?snap.format, bytes = snap.text.len(), "loaded snapshot");
    Ok(snap)
}

pub fn load_projections(settings: &Settings, location: &str) -> Result<Vec<TeamProjection>, AppError> {
    let snap = load_snapshot(settings, location)?;
    parse_projections(&snap.text, snap.format)
}

pub fn build_dist(args: &DistArgs, settings: &Settings) -> Result<ChartPage, AppError> {
    let projections = load_projections(settings, &args.render.input)?;
    let prev_medians = match &args.previous {
        Some(location) => load_projections(settings, location)?
            .iter()
            .map(|p| (p.team.clone(), POINT_ESTIMATE.of(p) as f64))
            .collect(),
        None => BTreeMap::new(),
    };

    let config = WinDistConfig {
        teams: args.render.teams.clone(),
        title: args.render.title.clone(),
        theme: None,
        compact: args.compact,
        prev_medians,
        updated: args.updated.clone(),
    };
    let view_height = if args.compact { 300.0 } else { 400.0 };
    Ok(render_page(&args.render, settings, view_height, "Projected wins", |c, ctx| {
        render_win_distribution(c, &projections, &config, ctx)
    }))
}

pub fn build_elo(args: &EloArgs, settings: &Settings) -> Result<ChartPage, AppError> {
    let snap = load_snapshot(settings, &args.render.input)?;
    let history = match &args.schedule {
        Some(location) => {
            let initial = parse_ratings(&snap.text, snap.format)?;
            let schedule_snap = load_snapshot(settings, location)?;
            let schedule = parse_schedule(&schedule_snap.text)?;
            let mut history = elo_history(&schedule, &initial, HOME_FIELD_ADVANTAGE);
            if let Some(season) = args.season {
                history.values_mut().for_each(|points| points.retain(|p| p.date.year() == season));
            }
            debug!(teams = history.len(), "replayed ELO history");
            history
        }
        None => parse_elo_history(&snap.text, snap.format, args.season)?,
    };
    let season = match args.season {
        Some(season) => season,
        None => history
            .values()
            .flat_map(|points| points.iter().map(|p| p.date.year()))
            .max()
            .ok_or_else(|| AppError::new(3, "ELO history has no ratings."))?,
    };

    let config = EloConfig {
        teams: args.render.teams.clone(),
        season,
        title: args.render.title.clone(),
        theme: None,
    };
    let fallback = format!("{season} ELO ratings");
    Ok(render_page(&args.render, settings, 380.0, &fallback, |c, ctx| {
        render_elo_trend(c, &history, &config, ctx)
    }))
}

pub fn build_race(args: &RaceArgs, settings: &Settings) -> Result<ChartPage, AppError> {
    let snap = load_snapshot(settings, &args.render.input)?;
    let history = parse_playoff_history(&snap.text, snap.format)?;

    let config = RaceConfig {
        teams: args.render.teams.clone(),
        metric: args.metric,
        title: args.render.title.clone(),
        theme: None,
    };
    Ok(render_page(&args.render, settings, 380.0, args.metric.label(), |c, ctx| {
        render_playoff_race(c, &history, &config, ctx)
    }))
}

pub fn build_player(args: &PlayerArgs, settings: &Settings) -> Result<ChartPage, AppError> {
    let snap = load_snapshot(settings, &args.render.input)?;
    let mut stats = parse_player_stats(&snap.text, snap.format)?;
    // `--teams` narrows a multi-club career to those stints.
    if !args.render.teams.is_empty() {
        stats.retain(|row| {
            row.team
                .as_deref()
                .is_some_and(|team| args.render.teams.iter().any(|t| t.eq_ignore_ascii_case(team)))
        });
    }

    let config = PlayerChartConfig {
        metrics: args.metrics.clone(),
        title: args.render.title.clone(),
        player: args.player.clone(),
        theme: None,
    };
    let fallback = args.player.clone().unwrap_or_else(|| "Player stats".to_string());
    Ok(render_page(&args.render, settings, 360.0, &fallback, |c, ctx| {
        render_player_stats(c, &stats, &config, ctx)
    }))
}

/// Render into a fresh container sized like the page, then replay the
/// requested hover position.
fn render_page(
    render: &RenderArgs,
    settings: &Settings,
    view_height: f64,
    fallback_title: &str,
    draw: impl FnOnce(&mut Container, &RenderContext),
) -> ChartPage {
    let settings = settings.clone().with_overrides(render.theme, render.reduced_motion);
    let ctx = settings.render_context();

    let width = render.container_width.max(1.0);
    let mut container = Container::sized(width, width * view_height / VIEW_WIDTH);
    draw(&mut container, &ctx);

    if let (Some(x), Some(y)) = (render.hover_x, render.hover_y) {
        let bounds = container.bounds();
        container.pointer_move(bounds.x + x, bounds.y + y);
        debug!(x, y, "applied hover snapshot");
    }

    ChartPage {
        title: render.title.clone().unwrap_or_else(|| fallback_title.to_string()),
        container,
        theme: ctx.theme,
    }
}

pub fn run_simulation(args: &SimulateArgs, settings: &Settings) -> Result<SimulationRun, AppError> {
    let schedule_snap = load_snapshot(settings, &args.schedule)?;
    let schedule = parse_schedule(&schedule_snap.text)?;

    let ratings_snap = load_snapshot(settings, &args.ratings)?;
    let mut ratings = parse_ratings(&ratings_snap.text, ratings_snap.format)?;

    if let Some(location) = &args.preseason {
        let snap = load_snapshot(settings, location)?;
        let preseason = parse_ratings(&snap.text, snap.format)?;
        ratings = regress_to_preseason(&ratings, &preseason, &games_played(&schedule), FADE_GAMES);
    }

    let config = SimConfig {
        simulations: args.simulations,
        seed: args.seed.or(settings.sim_seed).unwrap_or(DEFAULT_SEED),
        ..SimConfig::default()
    };
    info!(
        games = schedule.len(),
        teams = ratings.len(),
        simulations = config.simulations,
        seed = config.seed,
        "simulating season"
    );

    let matrix = simulate_season(&schedule, &ratings, &config)?;
    let projections = summarize(&matrix);
    let odds = [League::American, League::National]
        .into_iter()
        .map(|league| (league, playoff_odds(&matrix, league)))
        .collect();

    Ok(SimulationRun {
        file: ProjectionsFile {
            updated: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            simulations: matrix.simulations(),
            projections,
        },
        odds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::metrics::MetricKey;
    use crate::domain::OddsMetric;
    use crate::render::tooltip::TOOLTIP_CLASS;
    use std::path::PathBuf;

    fn render_args(input: &Path) -> RenderArgs {
        RenderArgs {
            input: input.to_string_lossy().to_string(),
            out: PathBuf::from("chart.html"),
            theme: None,
            reduced_motion: true,
            container_width: 720.0,
            hover_x: None,
            hover_y: None,
            title: None,
            teams: Vec::new(),
        }
    }

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    const PROJECTIONS: &str = r#"{"updated":"2026-06-01","projections":[
        {"team":"NYY","median_wins":91,"avg_wins":90.6,"std_dev":5.8,"p10":83,"p25":87,"p75":95,"p90":98},
        {"team":"BOS","median_wins":84,"avg_wins":84.2,"std_dev":6.1,"p10":76,"p25":80,"p75":88,"p90":92}
    ]}"#;

    fn tooltip_opacity(page: &ChartPage) -> Option<String> {
        page.container
            .dom()
            .find_all(TOOLTIP_CLASS)
            .first()
            .and_then(|el| el.get_style("opacity"))
            .map(str::to_string)
    }

    #[test]
    fn dist_page_renders_and_replays_hover() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "projections.json", PROJECTIONS);

        let mut args = DistArgs {
            render: render_args(&input),
            compact: false,
            previous: None,
            updated: None,
        };
        let page = build_dist(&args, &Settings::default()).unwrap();
        assert_eq!(page.title, "Projected wins");
        assert_eq!(page.container.bounds().height, 400.0);
        assert_eq!(page.container.count_tag("svg"), 1);
        assert_eq!(tooltip_opacity(&page).as_deref(), Some("0"));

        args.render.hover_x = Some(360.0);
        args.render.hover_y = Some(200.0);
        let hovered = build_dist(&args, &Settings::default()).unwrap();
        assert_eq!(tooltip_opacity(&hovered).as_deref(), Some("1"));

        let out = dir.path().join("chart.html");
        hovered.write(&out).unwrap();
        assert!(std::fs::read_to_string(out).unwrap().contains("<title>Projected wins</title>"));
    }

    #[test]
    fn elo_defaults_to_latest_season() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "elo.csv",
            "date,team,elo\n2025-09-28,NYY,1540\n2026-04-01,NYY,1530\n2026-04-02,NYY,1534\n",
        );
        let args = EloArgs {
            render: render_args(&input),
            season: None,
            schedule: None,
        };
        let page = build_elo(&args, &Settings::default()).unwrap();
        assert_eq!(page.title, "2026 ELO ratings");
        assert_eq!(page.container.count_tag("svg"), 1);
    }

    #[test]
    fn elo_replays_a_schedule_from_starting_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let ratings = write(dir.path(), "ratings.csv", "team,elo\nNYY,1500\nBOS,1500\n");
        let schedule = write(
            dir.path(),
            "schedule.csv",
            "date,homeTeam,awayTeam,homeScore,awayScore\n\
             2026-04-01,NYY,BOS,5,2\n\
             2026-04-02,BOS,NYY,4,1\n\
             2026-04-03,NYY,BOS,,\n",
        );
        let args = EloArgs {
            render: render_args(&ratings),
            season: None,
            schedule: Some(schedule.to_string_lossy().to_string()),
        };
        let page = build_elo(&args, &Settings::default()).unwrap();
        assert_eq!(page.title, "2026 ELO ratings");
        assert_eq!(page.container.dom().find_all("series-line").len(), 2);
    }

    #[test]
    fn race_and_player_pages_render() {
        let dir = tempfile::tempdir().unwrap();
        let race_input = write(
            dir.path(),
            "odds.json",
            r#"[{"date":"2026-05-01","team":"SEA","playoff_pct":40.0},
                {"date":"2026-05-02","team":"SEA","playoff_pct":44.5}]"#,
        );
        let race = build_race(
            &RaceArgs {
                render: render_args(&race_input),
                metric: OddsMetric::Playoff,
            },
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(race.container.count_tag("svg"), 1);

        let player_input = write(
            dir.path(),
            "judge.csv",
            "season,team,home_runs\n2022,NYY,62\n2023,NYY,37\n2024,NYY,58\n",
        );
        let player = build_player(
            &PlayerArgs {
                render: render_args(&player_input),
                metrics: vec![MetricKey::HomeRuns],
                player: Some("Aaron Judge".to_string()),
            },
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(player.title, "Aaron Judge");
        assert_eq!(player.container.count_tag("svg"), 1);
    }

    #[test]
    fn simulation_run_is_seeded_and_covers_both_leagues() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = write(
            dir.path(),
            "schedule.csv",
            "date,homeTeam,awayTeam,homeScore,awayScore\n\
             2026-04-01,NYY,BOS,5,3\n\
             2026-09-01,BOS,NYY,,\n\
             2026-09-02,LAD,SD,,\n",
        );
        let ratings = write(dir.path(), "ratings.csv", "team,elo\nNYY,1560\nBOS,1500\nLAD,1580\nSD,1520\n");
        let args = SimulateArgs {
            schedule: schedule.to_string_lossy().to_string(),
            ratings: ratings.to_string_lossy().to_string(),
            preseason: None,
            simulations: 200,
            seed: Some(7),
            out: dir.path().join("projections.json"),
            odds_out: None,
            league: None,
        };

        let a = run_simulation(&args, &Settings::default()).unwrap();
        let b = run_simulation(&args, &Settings::default()).unwrap();
        assert_eq!(a.file.projections, b.file.projections);
        assert_eq!(a.file.simulations, 200);
        assert_eq!(a.file.projections.len(), 4);
        assert!(a.odds.contains_key(&League::American));
        assert!(a.odds.contains_key(&League::National));
    }

    #[test]
    fn missing_snapshot_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = DistArgs {
            render: render_args(&dir.path().join("nope.json")),
            compact: false,
            previous: None,
            updated: None,
        };
        assert_eq!(build_dist(&args, &Settings::default()).err().map(|e| e.exit_code()), Some(2));
    }
}
