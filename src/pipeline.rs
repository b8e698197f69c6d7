use std::path::Path;
use tracing::info;

use crate::analysis::hero_stats::{aggregate, HeroTable, MatchEntry};
use crate::analysis::phase::{classify_heroes, PhaseThresholds};
use crate::analysis::rates::apply_rates;
use crate::analysis::ratings::{apply_ratings, compile_rows, RatingRow, RatingTable};
use crate::api::models::HeroConstants;
use crate::config::{HERO_PHASES_FILE, HERO_RATES_FILE, HERO_TOTALS_FILE};
use crate::error::AppError;
use crate::store::save_json;

/// Snapshot of the hero table after each stage.
#[derive(Debug, Clone, Default)]
pub struct StageSnapshots {
    pub totals: HeroTable,
    pub phases: HeroTable,
    pub rates: HeroTable,
}

impl StageSnapshots {
    pub fn save(&self, dir: &Path) -> Result<(), AppError> {
        save_json(&dir.join(HERO_TOTALS_FILE), &self.totals)?;
        save_json(&dir.join(HERO_PHASES_FILE), &self.phases)?;
        save_json(&dir.join(HERO_RATES_FILE), &self.rates)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: HeroTable,
    pub thresholds: Option<PhaseThresholds>,
    pub rows: Vec<RatingRow>,
    pub snapshots: Option<StageSnapshots>,
}

/// aggregate -> classify -> rates -> ratings -> rows, all in memory.
pub fn run_pipeline(
    entries: &[MatchEntry],
    constants: &HeroConstants,
    ratings: &RatingTable,
    keep_snapshots: bool,
) -> PipelineOutput {
    let mut snapshots = StageSnapshots::default();

    let mut records = aggregate(entries, constants);
    if keep_snapshots {
        snapshots.totals = records.clone();
    }

    let thresholds = classify_heroes(&mut records);
    if keep_snapshots {
        snapshots.phases = records.clone();
    }

    apply_rates(&mut records);
    if keep_snapshots {
        snapshots.rates = records.clone();
    }

    apply_ratings(&mut records, ratings);
    let rows = compile_rows(&records);

    info!(
        entries = entries.len(),
        heroes = records.len(),
        rows = rows.len(),
        "pipeline finished"
    );

    PipelineOutput {
        records,
        thresholds,
        rows,
        snapshots: keep_snapshots.then_some(snapshots),
    }
}
