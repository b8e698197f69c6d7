use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::store::{load_json_optional, save_json};

// OpenDota free tier
pub const MAX_REQUESTS_PER_DAY: u32 = 2000;
pub const MAX_REQUESTS_PER_MINUTE: u32 = 60;

/// Persisted request budget for one API.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestLog {
    pub api: String,
    pub requests_today: u32,
    pub requests_this_minute: u32,
    pub last_request: DateTime<Utc>,
    pub day_reset: DateTime<Utc>,
    pub minute_reset: DateTime<Utc>,
    #[serde(skip)]
    path: PathBuf,
}

impl RequestLog {
    pub fn new(api: &str, path: &Path) -> Self {
        let now = Utc::now();
        RequestLog {
            api: api.to_string(),
            requests_today: 0,
            requests_this_minute: 0,
            last_request: now,
            day_reset: now + Duration::days(1),
            minute_reset: now + Duration::minutes(1),
            path: path.to_path_buf(),
        }
    }

    pub fn load(api: &str, path: &Path) -> Result<Self, AppError> {
        let mut log = match load_json_optional::<RequestLog>(path)? {
            Some(mut log) => {
                log.path = path.to_path_buf();
                log
            }
            None => return Ok(RequestLog::new(api, path)),
        };
        log.roll_windows(Utc::now());
        Ok(log)
    }

    pub fn save(&self) -> Result<(), AppError> {
        save_json(&self.path, self)
    }

    fn roll_windows(&mut self, now: DateTime<Utc>) {
        if now > self.day_reset {
            self.requests_today = 0;
            self.day_reset = now + Duration::days(1);
        }
        if now > self.minute_reset {
            self.requests_this_minute = 0;
            self.minute_reset = now + Duration::minutes(1);
        }
    }

    /// Rolls elapsed windows first, so a long run regains its minute budget.
    pub fn can_make_request(&mut self) -> bool {
        self.roll_windows(Utc::now());
        self.requests_today < MAX_REQUESTS_PER_DAY
            && self.requests_this_minute < MAX_REQUESTS_PER_MINUTE
    }

    pub fn record_request(&mut self) {
        let now = Utc::now();
        self.roll_windows(now);
        self.requests_today += 1;
        self.requests_this_minute += 1;
        self.last_request = now;
    }

    pub fn get_remaining(&self) -> u32 {
        MAX_REQUESTS_PER_DAY.saturating_sub(self.requests_today)
    }

    pub fn get_reset_time(&self) -> DateTime<Utc> {
        self.day_reset.min(self.minute_reset)
    }
}
