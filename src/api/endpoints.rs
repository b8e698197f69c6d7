// Base URLs and paths for the two statistics providers

pub const OPENDOTA_BASE_URL: &str = "https://api.opendota.com/api";
pub const OPENDOTA_HERO_CONSTANTS: &str = "/constants/heroes";
pub const OPENDOTA_PRO_MATCHES: &str = "/proMatches";
pub const OPENDOTA_MATCH: &str = "/matches";

pub const PANDASCORE_BASE_URL: &str = "https://api.pandascore.co";
pub const PANDASCORE_RUNNING_MATCHES: &str = "/dota2/matches/running";

pub const USER_AGENT: &str = concat!("dota_hero_stats/", env!("CARGO_PKG_VERSION"));
