use crate::error::AppError;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const HERO_CONSTANTS_FILE: &str = "hero_constants.json";
pub const MATCH_ARCHIVE_FILE: &str = "match_archive.json";
pub const MATCH_ENTRIES_FILE: &str = "match_entries.json";
pub const RATINGS_INPUT_FILE: &str = "hero_ratings_input.json";
pub const HERO_TOTALS_FILE: &str = "hero_totals.json";
pub const HERO_PHASES_FILE: &str = "hero_phases.json";
pub const HERO_RATES_FILE: &str = "hero_rates.json";
pub const HERO_STATS_FILE: &str = "hero_stats.json";
pub const LIVE_DIR: &str = "live";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub opendota_api_key: Option<String>,
    pub pandascore_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub request_delay: Duration,
    pub poll_interval: Duration,
    pub live_league_ids: Vec<i64>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let opendota_api_key = non_empty_var("OPENDOTA_API_KEY");
        let pandascore_api_key = non_empty_var("PANDASCORE_API_KEY");

        let data_dir = non_empty_var("DOTA_STATS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let state_dir = non_empty_var("DOTA_STATS_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        let request_delay = Duration::from_millis(parse_u64_var(
            "DOTA_STATS_REQUEST_DELAY_MS",
            DEFAULT_REQUEST_DELAY_MS,
        )?);

        let poll_interval = Duration::from_secs(parse_u64_var(
            "DOTA_STATS_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let live_league_ids = match non_empty_var("DOTA_STATS_LIVE_LEAGUES") {
            Some(raw) => parse_league_ids(&raw)?,
            None => Vec::new(),
        };

        Ok(Config {
            opendota_api_key,
            pandascore_api_key,
            data_dir,
            state_dir,
            request_delay,
            poll_interval,
            live_league_ids,
        })
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn live_dir(&self) -> PathBuf {
        self.data_dir.join(LIVE_DIR)
    }

    pub fn request_log_path(&self, api: &str) -> PathBuf {
        self.state_dir.join(format!("{}.ratelimit.json", api))
    }

    pub fn require_pandascore_key(&self) -> Result<&str, AppError> {
        self.pandascore_api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError(
                "PANDASCORE_API_KEY not found in environment or .env file".to_string(),
            )
        })
    }
}

fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dota_hero_stats")
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_u64_var(name: &str, default: u64) -> Result<u64, AppError> {
    match non_empty_var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} must be a non-negative integer, got '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

/// Parses a comma-separated list of league ids, ignoring blank items.
pub fn parse_league_ids(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::ConfigError(format!("Invalid league id '{}'", s)))
        })
        .collect()
}

pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
