pub mod client;
pub mod endpoints;
pub mod models;

use crate::error::AppError;
use models::{HeroConstants, LiveMatch, MatchDetail, ProMatch};

/// Match and hero statistics provider.
pub trait StatsSource {
    fn hero_constants(&self) -> Result<HeroConstants, AppError>;
    fn pro_matches(&self, limit: usize) -> Result<Vec<ProMatch>, AppError>;
    fn match_detail(&self, match_id: i64) -> Result<MatchDetail, AppError>;
}

/// Provider of currently running matches.
pub trait LiveSource {
    fn running_matches(&self) -> Result<Vec<LiveMatch>, AppError>;
}
