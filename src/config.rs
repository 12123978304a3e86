//! Ambient settings from the environment (and `.env`).
//!
//! | variable                  | meaning                                  |
//! |---------------------------|------------------------------------------|
//! | `PENNANT_THEME`           | `light` or `dark`                        |
//! | `PENNANT_REDUCED_MOTION`  | `1`/`true`/`yes` disables animation      |
//! | `PENNANT_DATA_URL`        | base URL for relative snapshot paths     |
//! | `PENNANT_SIM_SEED`        | default simulation seed                  |
//!
//! CLI flags win over these; see [`Settings::with_overrides`].

use crate::error::AppError;
use crate::io::fetch::is_url;
use crate::render::theme::{RenderContext, ThemeMode};

pub const ENV_THEME: &str = "PENNANT_THEME";
pub const ENV_REDUCED_MOTION: &str = "PENNANT_REDUCED_MOTION";
pub const ENV_DATA_URL: &str = "PENNANT_DATA_URL";
pub const ENV_SIM_SEED: &str = "PENNANT_SIM_SEED";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub theme: ThemeMode,
    pub reduced_motion: bool,
    pub data_url: Option<String>,
    pub sim_seed: Option<u64>,
}

impl Settings {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let theme = match get(ENV_THEME) {
            Some(raw) => ThemeMode::parse(&raw)
                .ok_or_else(|| AppError::new(2, format!("{ENV_THEME} must be light or dark, got {raw:?}.")))?,
            None => ThemeMode::default(),
        };
        let reduced_motion = match get(ENV_REDUCED_MOTION) {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| AppError::new(2, format!("{ENV_REDUCED_MOTION} must be a boolean, got {raw:?}.")))?,
            None => false,
        };
        let sim_seed = get(ENV_SIM_SEED)
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| AppError::new(2, format!("{ENV_SIM_SEED} must be an unsigned integer, got {raw:?}.")))
            })
            .transpose()?;

        Ok(Self {
            theme,
            reduced_motion,
            data_url: get(ENV_DATA_URL).map(|u| u.trim_end_matches('/').to_string()),
            sim_seed,
        })
    }

    /// Apply explicit CLI choices. `reduced_motion` can only be switched on.
    pub fn with_overrides(mut self, theme: Option<ThemeMode>, reduced_motion: bool) -> Self {
        if let Some(theme) = theme {
            self.theme = theme;
        }
        self.reduced_motion |= reduced_motion;
        self
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::for_mode(self.theme, self.reduced_motion)
    }

    /// Resolve a snapshot location against `data_url` unless it is already a
    /// URL or an existing/absolute path.
    pub fn resolve_location(&self, location: &str) -> String {
        let path = std::path::Path::new(location);
        match &self.data_url {
            Some(base) if !is_url(location) && location != "-" && !path.is_absolute() && !path.exists() => {
                format!("{base}/{}", location.trim_start_matches("./"))
            }
            _ => location.to_string(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
