use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::hero_stats::{HeroRecord, HeroTable};
use super::phase::GamePhase;

pub const NOT_AVAILABLE: &str = "N/A";

/// Qualitative early/mid/late ratings on a 1-5 scale. Missing or
/// out-of-range values become N/A.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRatings {
    #[serde(default)]
    pub early: Option<i64>,
    #[serde(default)]
    pub mid: Option<i64>,
    #[serde(default)]
    pub late: Option<i64>,
}

/// Hero id string -> ratings, as supplied by an external source.
pub type RatingTable = HashMap<String, PhaseRatings>;

fn valid_rating(value: i64) -> Option<u8> {
    (1..=5).contains(&value).then(|| value as u8)
}

/// Copies external ratings onto the records. Out-of-range values are dropped.
pub fn apply_ratings(records: &mut HeroTable, ratings: &RatingTable) {
    for (id, rating) in ratings {
        let Some(record) = records.get_mut(id) else {
            warn!(hero_id = %id, "rating supplied for unknown hero, ignoring");
            continue;
        };

        for (label, value, slot) in [
            ("early", rating.early, &mut record.early_rating),
            ("mid", rating.mid, &mut record.mid_rating),
            ("late", rating.late, &mut record.late_rating),
        ] {
            *slot = value.and_then(valid_rating);
            match value {
                Some(value) if slot.is_none() => {
                    warn!(
                        hero_id = %id,
                        phase = label,
                        value,
                        "rating outside 1-5, treating as N/A"
                    );
                }
                None => warn!(hero_id = %id, phase = label, "rating missing, treating as N/A"),
                _ => {}
            }
        }
    }
}

/// Flat projection of one picked hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub hero_id: String,
    pub name: String,
    pub primary_attr: String,
    pub game_phase: String,
    pub picks: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_gpm: f64,
    pub kda_ratio: f64,
    pub early_rating: String,
    pub mid_rating: String,
    pub late_rating: String,
}

impl RatingRow {
    pub const COLUMNS: [&'static str; 15] = [
        "hero_id",
        "name",
        "primary_attr",
        "game_phase",
        "picks",
        "wins",
        "win_rate",
        "avg_kills",
        "avg_deaths",
        "avg_assists",
        "avg_gpm",
        "kda_ratio",
        "early_rating",
        "mid_rating",
        "late_rating",
    ];

    pub fn from_record(hero_id: &str, record: &HeroRecord) -> Self {
        RatingRow {
            hero_id: hero_id.to_string(),
            name: record.name.clone(),
            primary_attr: record
                .primary_attr
                .map(|a| a.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            game_phase: record
                .game_phase
                .unwrap_or(GamePhase::NotApplicable)
                .to_string(),
            picks: record.picks,
            wins: record.wins,
            win_rate: round_to(record.win_rate(), 1),
            avg_kills: round_to(record.avg_kills, 2),
            avg_deaths: round_to(record.avg_deaths, 2),
            avg_assists: round_to(record.avg_assists, 2),
            avg_gpm: round_to(record.avg_gpm, 2),
            kda_ratio: round_to(record.kda_ratio, 2),
            early_rating: rating_cell(record.early_rating),
            mid_rating: rating_cell(record.mid_rating),
            late_rating: rating_cell(record.late_rating),
        }
    }

    /// Cells in `COLUMNS` order, formatted for text outputs.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.hero_id.clone(),
            self.name.clone(),
            self.primary_attr.clone(),
            self.game_phase.clone(),
            self.picks.to_string(),
            self.wins.to_string(),
            self.win_rate.to_string(),
            self.avg_kills.to_string(),
            self.avg_deaths.to_string(),
            self.avg_assists.to_string(),
            self.avg_gpm.to_string(),
            self.kda_ratio.to_string(),
            self.early_rating.clone(),
            self.mid_rating.clone(),
            self.late_rating.clone(),
        ]
    }
}

fn rating_cell(rating: Option<u8>) -> String {
    rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One row per picked hero, ordered by name (byte order), then hero id.
pub fn compile_rows(records: &HeroTable) -> Vec<RatingRow> {
    let mut rows: Vec<RatingRow> = records
        .iter()
        .filter(|(_, record)| record.picks > 0)
        .map(|(id, record)| RatingRow::from_record(id, record))
        .collect();

    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.hero_id.cmp(&b.hero_id)));
    rows
}
