pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod fetch;
pub mod live;
pub mod pipeline;
pub mod rate_limit;
pub mod store;
