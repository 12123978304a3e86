//! Snapshot ingest: JSON and CSV into typed chart and simulation inputs.
//!
//! The published data pipeline writes JSON; spreadsheets and hand-made
//! fixtures tend to be CSV. Both are accepted for every dataset that has a
//! natural tabular form.
//!
//! Conventions shared by every loader:
//! - **Team codes are normalized** (`KCR` -> `KC`, lowercase -> uppercase)
//! - **CSV headers are forgiving**: BOM stripped, case and `_`/space/`-`
//!   ignored, `%` read as `pct`, so `homeTeam` matches `home_team` and
//!   `K%` matches `k_pct`
//! - **Row-level validation** for CSV: bad rows are skipped, logged, and
//!   reported in [`RowError`]s; zero usable rows is exit code 3
//! - **Malformed JSON** is exit code 2

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::teams::normalize_team_code;
use crate::domain::{EloPoint, PlayerSeasonStats, PlayoffOddsPoint, ScheduledGame, TeamProjection};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Csv,
}

impl SnapshotFormat {
    /// By file extension, falling back to the first non-blank character.
    pub fn detect(location: &str, text: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or_default();
        if path.ends_with(".json") {
            return SnapshotFormat::Json;
        }
        if path.ends_with(".csv") {
            return SnapshotFormat::Csv;
        }
        match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('[' | '{') => SnapshotFormat::Json,
            _ => SnapshotFormat::Csv,
        }
    }
}

/// A row-level error encountered during CSV ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed CSV rows plus what was skipped.
#[derive(Debug, Clone)]
pub struct CsvRows<T> {
    pub records: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

// ---------------------------------------------------------------------------
// Projections

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectionsJson {
    List(Vec<TeamProjection>),
    Wrapped { projections: Vec<TeamProjection> },
}

const PROJECTION_FIELDS: [&str; 8] = [
    "team",
    "median_wins",
    "avg_wins",
    "std_dev",
    "p10",
    "p25",
    "p75",
    "p90",
];

pub fn parse_projections(text: &str, format: SnapshotFormat) -> Result<Vec<TeamProjection>, AppError> {
    let mut projections = match format {
        SnapshotFormat::Json => match parse_json::<ProjectionsJson>(text, "projections")? {
            ProjectionsJson::List(list) | ProjectionsJson::Wrapped { projections: list } => list,
        },
        SnapshotFormat::Csv => deserialize_csv::<TeamProjection>(text, &PROJECTION_FIELDS, "projections")?.records,
    };
    projections.retain(|p| {
        let ok = p.avg_wins.is_finite();
        if !ok {
            warn!(team = %p.team, "dropping projection with non-finite mean");
        }
        ok
    });
    for p in &mut projections {
        p.team = normalize_team_code(&p.team);
    }
    if projections.is_empty() {
        return Err(AppError::new(3, "Projections snapshot contains no teams."));
    }
    Ok(projections)
}

// ---------------------------------------------------------------------------
// ELO history

/// `team -> points`, sorted by date. `season` keeps only that year.
pub fn parse_elo_history(
    text: &str,
    format: SnapshotFormat,
    season: Option<i32>,
) -> Result<BTreeMap<String, Vec<EloPoint>>, AppError> {
    let raw: Vec<(String, EloPoint)> = match format {
        SnapshotFormat::Json => parse_json::<BTreeMap<String, Vec<EloPoint>>>(text, "ELO history")?
            .into_iter()
            .flat_map(|(team, points)| points.into_iter().map(move |p| (team.clone(), p)))
            .collect(),
        SnapshotFormat::Csv => {
            read_csv(text, &["date", "team", "elo"], "ELO history", |record, headers| {
                let date = parse_date(get_required(record, headers, "date")?)?;
                let team = get_required(record, headers, "team")?.to_string();
                let elo = parse_f64(get_required(record, headers, "elo")?, "elo")?;
                Ok((team, EloPoint { date, elo }))
            })?
            .records
        }
    };

    let mut out: BTreeMap<String, Vec<EloPoint>> = BTreeMap::new();
    for (team, point) in raw {
        if season.is_some_and(|s| point.date.year() != s) || !point.elo.is_finite() {
            continue;
        }
        out.entry(normalize_team_code(&team)).or_default().push(point);
    }
    for points in out.values_mut() {
        points.sort_by_key(|p| p.date);
    }
    debug!(teams = out.len(), "loaded ELO history");
    Ok(out)
}

// ---------------------------------------------------------------------------
// Playoff odds history

#[derive(Deserialize)]
struct OddsRow {
    date: NaiveDate,
    team: String,
    playoff_pct: f64,
    #[serde(default)]
    division_pct: Option<f64>,
    #[serde(default)]
    wildcard_pct: Option<f64>,
}

impl OddsRow {
    fn split(self) -> (String, PlayoffOddsPoint) {
        (
            self.team,
            PlayoffOddsPoint {
                date: self.date,
                playoff_pct: self.playoff_pct,
                division_pct: self.division_pct,
                wildcard_pct: self.wildcard_pct,
            },
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OddsHistoryJson {
    Rows(Vec<OddsRow>),
    ByTeam(BTreeMap<String, Vec<PlayoffOddsPoint>>),
}

const ODDS_FIELDS: [&str; 5] = ["date", "team", "playoff_pct", "division_pct", "wildcard_pct"];

/// `team -> points`, sorted by date; a repeated date keeps the last row.
pub fn parse_playoff_history(
    text: &str,
    format: SnapshotFormat,
) -> Result<BTreeMap<String, Vec<PlayoffOddsPoint>>, AppError> {
    let raw: Vec<(String, PlayoffOddsPoint)> = match format {
        SnapshotFormat::Json => match parse_json::<OddsHistoryJson>(text, "playoff odds history")? {
            OddsHistoryJson::Rows(rows) => rows.into_iter().map(OddsRow::split).collect(),
            OddsHistoryJson::ByTeam(map) => map
                .into_iter()
                .flat_map(|(team, points)| points.into_iter().map(move |p| (team.clone(), p)))
                .collect(),
        },
        SnapshotFormat::Csv => deserialize_csv::<OddsRow>(text, &ODDS_FIELDS, "playoff odds history")?
            .records
            .into_iter()
            .map(OddsRow::split)
            .collect(),
    };

    let mut by_team: BTreeMap<String, BTreeMap<NaiveDate, PlayoffOddsPoint>> = BTreeMap::new();
    for (team, point) in raw {
        by_team.entry(normalize_team_code(&team)).or_default().insert(point.date, point);
    }
    Ok(by_team
        .into_iter()
        .map(|(team, points)| (team, points.into_values().collect()))
        .collect())
}

// ---------------------------------------------------------------------------
// Player stats

const PLAYER_FIELDS: [&str; 26] = [
    "season",
    "team",
    "games",
    "plate_appearances",
    "hits",
    "home_runs",
    "rbi",
    "stolen_bases",
    "avg",
    "obp",
    "slg",
    "ops",
    "woba",
    "wrc_plus",
    "k_pct",
    "bb_pct",
    "war",
    "innings",
    "era",
    "whip",
    "fip",
    "k_per_9",
    "bb_per_9",
    "exit_velocity",
    "barrel_pct",
    "hard_hit_pct",
];

/// Rows sorted by season (stable, so split-season rows keep file order).
pub fn parse_player_stats(text: &str, format: SnapshotFormat) -> Result<Vec<PlayerSeasonStats>, AppError> {
    let mut rows = match format {
        SnapshotFormat::Json => parse_json::<Vec<PlayerSeasonStats>>(text, "player stats")?,
        SnapshotFormat::Csv => deserialize_csv::<PlayerSeasonStats>(text, &PLAYER_FIELDS, "player stats")?.records,
    };
    if rows.is_empty() {
        return Err(AppError::new(3, "Player stats snapshot contains no seasons."));
    }
    rows.sort_by_key(|r| r.season);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Simulation inputs

/// Schedule CSV: `date, homeTeam, awayTeam, homeScore?, awayScore?`.
pub fn parse_schedule(text: &str) -> Result<Vec<ScheduledGame>, AppError> {
    let rows = read_csv(
        text,
        &["date", "home_team", "away_team", "home_score", "away_score"],
        "schedule",
        |record, headers| {
            let date = parse_date(get_required(record, headers, "date")?)?;
            let home_team = normalize_team_code(get_required(record, headers, "home_team")?);
            let away_team = normalize_team_code(get_required(record, headers, "away_team")?);
            let home_score = parse_score(get_optional(record, headers, "home_score"))?;
            let away_score = parse_score(get_optional(record, headers, "away_score"))?;
            if home_team == away_team {
                return Err(format!("Team `{home_team}` cannot play itself."));
            }
            Ok(ScheduledGame {
                date,
                home_team,
                away_team,
                home_score,
                away_score,
            })
        },
    )?;
    Ok(rows.records)
}

/// Ratings as CSV `team, elo` or a JSON object `{"NYY": 1532.1, ...}`.
pub fn parse_ratings(text: &str, format: SnapshotFormat) -> Result<BTreeMap<String, f64>, AppError> {
    let pairs: Vec<(String, f64)> = match format {
        SnapshotFormat::Json => parse_json::<BTreeMap<String, f64>>(text, "ratings")?.into_iter().collect(),
        SnapshotFormat::Csv => {
            read_csv(text, &["team", "elo"], "ratings", |record, headers| {
                let team = get_required(record, headers, "team")?.to_string();
                let elo = parse_f64(get_required(record, headers, "elo")?, "elo")?;
                Ok((team, elo))
            })?
            .records
        }
    };
    let ratings: BTreeMap<String, f64> = pairs
        .into_iter()
        .filter(|(_, elo)| elo.is_finite())
        .map(|(team, elo)| (normalize_team_code(&team), elo))
        .collect();
    if ratings.is_empty() {
        return Err(AppError::new(3, "Ratings snapshot contains no teams."));
    }
    Ok(ratings)
}

// ---------------------------------------------------------------------------
// Shared plumbing

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, AppError> {
    serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| AppError::new(2, format!("Failed to parse {what} JSON: {e}")))
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Header cells renamed to the canonical field they match.
fn canonical_headers(headers: &StringRecord, fields: &[&str]) -> StringRecord {
    headers
        .iter()
        .map(|h| {
            let key = normalize_header_name(h);
            fields
                .iter()
                .find(|f| normalize_header_name(f) == key)
                .map_or(key, |f| f.to_string())
        })
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports UTF-8 CSVs with a BOM on the first header.
    let mut out = String::new();
    for c in name.trim().trim_start_matches('\u{feff}').chars() {
        match c {
            '%' => out.push_str("pct"),
            '+' => out.push_str("plus"),
            c if c.is_ascii_alphanumeric() => out.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }
    out
}

/// Parse every record with `parse_row`, collecting row errors.
fn read_csv<T>(
    text: &str,
    fields: &[&str],
    what: &str,
    parse_row: impl Fn(&StringRecord, &HashMap<String, usize>) -> Result<T, String>,
) -> Result<CsvRows<T>, AppError> {
    let mut reader = reader(text);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read {what} CSV headers: {e}")))?;
    let headers = canonical_headers(headers, fields);
    let header_map: HashMap<String, usize> = headers.iter().enumerate().map(|(i, h)| (h.to_string(), i)).collect();

    collect_rows(what, reader.records(), |record| parse_row(record, &header_map))
}

/// Deserialize every record into `T` via serde after header canonicalization.
fn deserialize_csv<T: DeserializeOwned>(text: &str, fields: &[&str], what: &str) -> Result<CsvRows<T>, AppError> {
    let mut reader = reader(text);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read {what} CSV headers: {e}")))?;
    let headers = canonical_headers(headers, fields);

    collect_rows(what, reader.records(), |record| {
        record.deserialize::<T>(Some(&headers)).map_err(|e| e.to_string())
    })
}

fn collect_rows<T>(
    what: &str,
    records: csv::StringRecordsIter<'_, &[u8]>,
    parse: impl Fn(&StringRecord) -> Result<T, String>,
) -> Result<CsvRows<T>, AppError> {
    let mut out = CsvRows {
        records: Vec::new(),
        row_errors: Vec::new(),
        rows_read: 0,
    };
    for (idx, result) in records.enumerate() {
        // Header is line 1.
        let line = idx + 2;
        out.rows_read += 1;
        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse(&record));
        match parsed {
            Ok(row) => out.records.push(row),
            Err(message) => {
                warn!(line, %message, "skipping {what} row");
                out.row_errors.push(RowError { line, message });
            }
        }
    }
    if out.records.is_empty() {
        let detail = out
            .row_errors
            .first()
            .map(|e| format!(" (line {}: {})", e.line, e.message))
            .unwrap_or_default();
        return Err(AppError::new(3, format!("No valid {what} rows{detail}.")));
    }
    Ok(out)
}

fn get_required<'a>(record: &'a StringRecord, headers: &HashMap<String, usize>, name: &str) -> Result<&'a str, String> {
    let idx = headers
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, headers: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = headers.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Pipeline output is ISO; the others show up in spreadsheet exports.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%Y%m%d"];
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD, YYYYMMDD."
    ))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid `{name}` value '{s}'."))
}

/// Scores are whole runs; pandas sometimes writes them as `5.0`.
fn parse_score(s: Option<&str>) -> Result<Option<u32>, String> {
    let Some(s) = s else { return Ok(None) };
    let v = parse_f64(s, "score")?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(format!("Invalid score '{s}'."));
    }
    Ok(Some(v as u32))
}
