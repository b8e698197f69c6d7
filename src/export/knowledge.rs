use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::KnowledgeMetadata;
use crate::analysis::ratings::RatingRow;
use crate::config::ensure_parent;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeExport {
    pub metadata: KnowledgeMetadata,
    pub heroes: Vec<RatingRow>,
}

/// Metadata object on the first line, then one hero row per line.
pub fn write_jsonl(
    path: &Path,
    metadata: &KnowledgeMetadata,
    rows: &[RatingRow],
) -> Result<(), AppError> {
    ensure_parent(path).map_err(|e| AppError::write_failed(path, e))?;
    let file = File::create(path).map_err(|e| AppError::write_failed(path, e))?;
    let mut out = BufWriter::new(file);

    write_line(&mut out, metadata).map_err(|e| AppError::write_failed(path, e))?;
    for row in rows {
        write_line(&mut out, row).map_err(|e| AppError::write_failed(path, e))?;
    }

    out.flush().map_err(|e| AppError::write_failed(path, e))?;
    Ok(())
}

fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")
}

pub fn write_yaml(
    path: &Path,
    metadata: &KnowledgeMetadata,
    rows: &[RatingRow],
) -> Result<(), AppError> {
    let export = KnowledgeExport {
        metadata: metadata.clone(),
        heroes: rows.to_vec(),
    };
    let yaml = serde_yaml::to_string(&export).map_err(|e| AppError::write_failed(path, e))?;

    ensure_parent(path).map_err(|e| AppError::write_failed(path, e))?;
    std::fs::write(path, yaml).map_err(|e| AppError::write_failed(path, e))
}
