pub mod hero_stats;
pub mod phase;
pub mod ranking;
pub mod rates;
pub mod ratings;
