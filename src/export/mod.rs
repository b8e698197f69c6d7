pub mod columnar;
pub mod knowledge;
pub mod tabular;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::phase::PhaseThresholds;
use crate::analysis::ratings::RatingRow;
use crate::error::AppError;
use crate::store::save_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Parquet,
    Jsonl,
    Yaml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Parquet,
        ExportFormat::Jsonl,
        ExportFormat::Yaml,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "hero_ratings.json",
            ExportFormat::Csv => "hero_ratings.csv",
            ExportFormat::Parquet => "hero_ratings.parquet",
            ExportFormat::Jsonl => "hero_knowledge.jsonl",
            ExportFormat::Yaml => "hero_knowledge.yaml",
        }
    }
}

/// Leading record of the knowledge exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    pub kind: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub hero_count: usize,
    pub thresholds: Option<PhaseThresholds>,
}

impl KnowledgeMetadata {
    pub fn new(rows: &[RatingRow], thresholds: Option<PhaseThresholds>) -> Self {
        KnowledgeMetadata {
            kind: "metadata".to_string(),
            generated_at: Utc::now(),
            source: "opendota".to_string(),
            hero_count: rows.len(),
            thresholds,
        }
    }
}

/// Writes `rows` in one format under `dir`, replacing any previous file.
pub fn export_rows(
    format: ExportFormat,
    rows: &[RatingRow],
    metadata: &KnowledgeMetadata,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let path = dir.join(format.file_name());
    match format {
        ExportFormat::Json => save_json(&path, rows)?,
        ExportFormat::Csv => tabular::write_csv(&path, rows)?,
        ExportFormat::Parquet => columnar::write_parquet(&path, rows)?,
        ExportFormat::Jsonl => knowledge::write_jsonl(&path, metadata, rows)?,
        ExportFormat::Yaml => knowledge::write_yaml(&path, metadata, rows)?,
    }
    info!(format = ?format, rows = rows.len(), path = %path.display(), "export written");
    Ok(path)
}
