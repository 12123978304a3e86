//! The 30 clubs: names, league/division alignment, and chart colors.
//!
//! Codes follow the MLB Stats API convention (`AZ`, `ATH`, `CWS`, …). Older
//! Retrosheet-derived files use different codes for eight clubs; see
//! [`normalize_team_code`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum League {
    #[serde(rename = "AL")]
    #[value(name = "AL", alias = "al")]
    American,
    #[serde(rename = "NL")]
    #[value(name = "NL", alias = "nl")]
    National,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    East,
    Central,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub league: League,
    pub division: Division,
    pub color: &'static str,
}

const fn team(
    code: &'static str,
    name: &'static str,
    league: League,
    division: Division,
    color: &'static str,
) -> TeamInfo {
    TeamInfo {
        code,
        name,
        league,
        division,
        color,
    }
}

use Division::{Central, East, West};
use League::{American as AL, National as NL};

pub const TEAMS: [TeamInfo; 30] = [
    team("BAL", "Baltimore Orioles", AL, East, "#df4601"),
    team("BOS", "Boston Red Sox", AL, East, "#bd3039"),
    team("NYY", "New York Yankees", AL, East, "#0c2340"),
    team("TB", "Tampa Bay Rays", AL, East, "#8fbce6"),
    team("TOR", "Toronto Blue Jays", AL, East, "#134a8e"),
    team("CWS", "Chicago White Sox", AL, Central, "#27251f"),
    team("CLE", "Cleveland Guardians", AL, Central, "#e31937"),
    team("DET", "Detroit Tigers", AL, Central, "#fa4616"),
    team("KC", "Kansas City Royals", AL, Central, "#004687"),
    team("MIN", "Minnesota Twins", AL, Central, "#002b5c"),
    team("HOU", "Houston Astros", AL, West, "#eb6e1f"),
    team("LAA", "Los Angeles Angels", AL, West, "#ba0021"),
    team("ATH", "Athletics", AL, West, "#003831"),
    team("SEA", "Seattle Mariners", AL, West, "#005c5c"),
    team("TEX", "Texas Rangers", AL, West, "#003278"),
    team("ATL", "Atlanta Braves", NL, East, "#ce1141"),
    team("MIA", "Miami Marlins", NL, East, "#00a3e0"),
    team("NYM", "New York Mets", NL, East, "#ff5910"),
    team("PHI", "Philadelphia Phillies", NL, East, "#e81828"),
    team("WSH", "Washington Nationals", NL, East, "#ab0003"),
    team("CHC", "Chicago Cubs", NL, Central, "#0e3386"),
    team("CIN", "Cincinnati Reds", NL, Central, "#c6011f"),
    team("MIL", "Milwaukee Brewers", NL, Central, "#ffc52f"),
    team("PIT", "Pittsburgh Pirates", NL, Central, "#fdb827"),
    team("STL", "St. Louis Cardinals", NL, Central, "#c41e3a"),
    team("AZ", "Arizona Diamondbacks", NL, West, "#a71930"),
    team("COL", "Colorado Rockies", NL, West, "#333366"),
    team("LAD", "Los Angeles Dodgers", NL, West, "#005a9c"),
    team("SD", "San Diego Padres", NL, West, "#2f241d"),
    team("SF", "San Francisco Giants", NL, West, "#fd5a1e"),
];

/// Fallback for codes outside the registry.
pub const DEFAULT_TEAM_COLOR: &str = "#6b7280";

/// Retrosheet code -> canonical code.
const LEGACY_CODES: [(&str, &str); 8] = [
    ("WSN", "WSH"),
    ("KCR", "KC"),
    ("SFG", "SF"),
    ("SDP", "SD"),
    ("CHW", "CWS"),
    ("ARI", "AZ"),
    ("OAK", "ATH"),
    ("TBR", "TB"),
];

/// Uppercase, trim, and map legacy codes onto the canonical set.
pub fn normalize_team_code(raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    LEGACY_CODES
        .iter()
        .find(|(legacy, _)| *legacy == code)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(code)
}

pub fn team_info(code: &str) -> Option<&'static TeamInfo> {
    TEAMS.iter().find(|t| t.code == code)
}

pub fn team_color(code: &str) -> &'static str {
    team_info(code).map_or(DEFAULT_TEAM_COLOR, |t| t.color)
}

pub fn team_name(code: &str) -> &str {
    team_info(code).map_or(code, |t| t.name)
}

pub fn teams_in_league(league: League) -> impl Iterator<Item = &'static TeamInfo> {
    TEAMS.iter().filter(move |t| t.league == league)
}
