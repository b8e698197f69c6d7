use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::hero_stats::{HeroRecord, HeroTable};

const LOW_QUANTILE: f64 = 0.33;
const HIGH_QUANTILE: f64 = 0.66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Early,
    #[serde(rename = "Early-Mid")]
    EarlyMid,
    Mid,
    #[serde(rename = "Mid-Late")]
    MidLate,
    Late,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Early => "Early",
            GamePhase::EarlyMid => "Early-Mid",
            GamePhase::Mid => "Mid",
            GamePhase::MidLate => "Mid-Late",
            GamePhase::Late => "Late",
            GamePhase::NotApplicable => "N/A",
        }
    }

    pub const ALL: [GamePhase; 6] = [
        GamePhase::Early,
        GamePhase::EarlyMid,
        GamePhase::Mid,
        GamePhase::MidLate,
        GamePhase::Late,
        GamePhase::NotApplicable,
    ];
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    fn from_series(values: &[f64]) -> Option<Self> {
        Some(Band {
            low: quantile(values, LOW_QUANTILE)?,
            high: quantile(values, HIGH_QUANTILE)?,
        })
    }
}

/// Cut-offs over average match duration (minutes) and primary attribute gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    pub duration: Band,
    pub gain: Band,
}

impl PhaseThresholds {
    /// Thresholds over every hero with at least one pick, or `None` if there are none.
    pub fn from_records(records: &HeroTable) -> Option<Self> {
        let picked: Vec<&HeroRecord> = records.values().filter(|r| r.picks > 0).collect();

        let durations: Vec<f64> = picked.iter().map(|r| r.avg_duration_minutes()).collect();
        let gains: Vec<f64> = picked.iter().map(|r| r.primary_gain()).collect();

        Some(PhaseThresholds {
            duration: Band::from_series(&durations)?,
            gain: Band::from_series(&gains)?,
        })
    }
}

/// Quantile with linear interpolation between order statistics.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Decision table; the first matching rule wins.
pub fn classify(primary_gain: f64, avg_duration: f64, thresholds: &PhaseThresholds) -> GamePhase {
    let gain_high = primary_gain >= thresholds.gain.high;
    let gain_low = primary_gain <= thresholds.gain.low;
    let duration_high = avg_duration >= thresholds.duration.high;
    let duration_low = avg_duration <= thresholds.duration.low;

    if gain_high && duration_high {
        GamePhase::Late
    } else if gain_high || duration_high {
        GamePhase::MidLate
    } else if gain_low && duration_low {
        GamePhase::Early
    } else if gain_low || duration_low {
        GamePhase::EarlyMid
    } else {
        GamePhase::Mid
    }
}

pub fn classify_record(record: &HeroRecord, thresholds: Option<&PhaseThresholds>) -> GamePhase {
    match thresholds {
        Some(t) if record.picks > 0 => {
            classify(record.primary_gain(), record.avg_duration_minutes(), t)
        }
        _ => GamePhase::NotApplicable,
    }
}

/// Labels every record against the given thresholds.
pub fn apply_phases(records: &mut HeroTable, thresholds: Option<&PhaseThresholds>) {
    for record in records.values_mut() {
        record.game_phase = Some(classify_record(record, thresholds));
    }
}

/// Computes thresholds once for the whole table, then labels every hero.
pub fn classify_heroes(records: &mut HeroTable) -> Option<PhaseThresholds> {
    let thresholds = PhaseThresholds::from_records(records);
    match &thresholds {
        Some(t) => info!(
            duration_low = t.duration.low,
            duration_high = t.duration.high,
            gain_low = t.gain.low,
            gain_high = t.gain.high,
            "phase thresholds computed"
        ),
        None => info!("no picked heroes, every phase is N/A"),
    }
    apply_phases(records, thresholds.as_ref());
    thresholds
}
