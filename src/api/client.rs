use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::MAX_REQUESTS_PER_MINUTE;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::endpoints::*;
use super::models::*;
use super::{LiveSource, StatsSource};

/// Fixed delay before every call plus an in-process per-minute quota.
pub struct RequestPacer {
    delay: Duration,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl RequestPacer {
    pub fn new(delay: Duration, per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        RequestPacer {
            delay,
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        }
    }

    pub fn wait(&self) {
        thread::sleep(self.delay);
        while let Err(not_until) = self.limiter.check() {
            thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }
}

/// GET `url` with the given query and headers, decoding the JSON body.
/// Non-success status and undecodable bodies fail this call only.
fn get_json<T: DeserializeOwned>(
    pacer: &RequestPacer,
    url: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
) -> Result<T, AppError> {
    pacer.wait();

    let mut request = ureq::get(url).set("User-Agent", USER_AGENT);
    for (name, value) in headers {
        request = request.set(name, value);
    }
    for (name, value) in query {
        request = request.query(name, value);
    }

    debug!(url, "GET");
    let body = match request.call() {
        Ok(resp) => resp
            .into_string()
            .map_err(|e| AppError::HttpError(e.to_string()))?,
        Err(ureq::Error::Status(status, _)) => {
            return Err(AppError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        Err(e) => return Err(AppError::HttpError(e.to_string())),
    };

    serde_json::from_str(&body).map_err(|e| AppError::JsonError(format!("{}: {}", url, e)))
}

pub struct OpenDotaClient {
    base_url: String,
    api_key: Option<String>,
    pacer: RequestPacer,
}

impl OpenDotaClient {
    pub fn new(config: &Config) -> Self {
        OpenDotaClient {
            base_url: OPENDOTA_BASE_URL.to_string(),
            api_key: config.opendota_api_key.clone(),
            pacer: RequestPacer::new(config.request_delay, MAX_REQUESTS_PER_MINUTE),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let query: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![("api_key", key)])
            .unwrap_or_default();
        get_json(&self.pacer, &url, &query, &[])
    }

    pub fn get_hero_constants(&self) -> Result<HeroConstants, AppError> {
        self.get(OPENDOTA_HERO_CONSTANTS)
    }

    pub fn get_pro_matches(&self, limit: usize) -> Result<Vec<ProMatch>, AppError> {
        let mut matches: Vec<ProMatch> = self.get(OPENDOTA_PRO_MATCHES)?;
        matches.truncate(limit);
        Ok(matches)
    }

    pub fn get_match(&self, match_id: i64) -> Result<MatchDetail, AppError> {
        self.get(&format!("{}/{}", OPENDOTA_MATCH, match_id))
    }
}

impl StatsSource for OpenDotaClient {
    fn hero_constants(&self) -> Result<HeroConstants, AppError> {
        self.get_hero_constants()
    }

    fn pro_matches(&self, limit: usize) -> Result<Vec<ProMatch>, AppError> {
        self.get_pro_matches(limit)
    }

    fn match_detail(&self, match_id: i64) -> Result<MatchDetail, AppError> {
        self.get_match(match_id)
    }
}

pub struct PandaScoreClient {
    base_url: String,
    token: String,
    pacer: RequestPacer,
}

impl PandaScoreClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(PandaScoreClient {
            base_url: PANDASCORE_BASE_URL.to_string(),
            token: config.require_pandascore_key()?.to_string(),
            pacer: RequestPacer::new(config.request_delay, MAX_REQUESTS_PER_MINUTE),
        })
    }

    pub fn get_running_matches(&self) -> Result<Vec<LiveMatch>, AppError> {
        let url = format!("{}{}", self.base_url, PANDASCORE_RUNNING_MATCHES);
        let auth = format!("Bearer {}", self.token);
        get_json(
            &self.pacer,
            &url,
            &[("per_page", "100")],
            &[("Authorization", auth.as_str()), ("Accept", "application/json")],
        )
    }
}

impl LiveSource for PandaScoreClient {
    fn running_matches(&self) -> Result<Vec<LiveMatch>, AppError> {
        self.get_running_matches()
    }
}
