use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::analysis::ratings::RatingRow;
use crate::config::ensure_parent;
use crate::error::AppError;

fn build_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("hero_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("primary_attr", DataType::Utf8, false),
        Field::new("game_phase", DataType::Utf8, false),
        Field::new("picks", DataType::UInt32, false),
        Field::new("wins", DataType::UInt32, false),
        Field::new("win_rate", DataType::Float64, false),
        Field::new("avg_kills", DataType::Float64, false),
        Field::new("avg_deaths", DataType::Float64, false),
        Field::new("avg_assists", DataType::Float64, false),
        Field::new("avg_gpm", DataType::Float64, false),
        Field::new("kda_ratio", DataType::Float64, false),
        Field::new("early_rating", DataType::Utf8, false),
        Field::new("mid_rating", DataType::Utf8, false),
        Field::new("late_rating", DataType::Utf8, false),
    ]))
}

fn strings(rows: &[RatingRow], f: impl Fn(&RatingRow) -> &str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(rows.iter().map(f)))
}

fn counts(rows: &[RatingRow], f: impl Fn(&RatingRow) -> u32) -> ArrayRef {
    Arc::new(UInt32Array::from_iter_values(rows.iter().map(f)))
}

fn floats(rows: &[RatingRow], f: impl Fn(&RatingRow) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
}

pub fn to_record_batch(rows: &[RatingRow]) -> Result<RecordBatch, AppError> {
    let columns: Vec<ArrayRef> = vec![
        strings(rows, |r| r.hero_id.as_str()),
        strings(rows, |r| r.name.as_str()),
        strings(rows, |r| r.primary_attr.as_str()),
        strings(rows, |r| r.game_phase.as_str()),
        counts(rows, |r| r.picks),
        counts(rows, |r| r.wins),
        floats(rows, |r| r.win_rate),
        floats(rows, |r| r.avg_kills),
        floats(rows, |r| r.avg_deaths),
        floats(rows, |r| r.avg_assists),
        floats(rows, |r| r.avg_gpm),
        floats(rows, |r| r.kda_ratio),
        strings(rows, |r| r.early_rating.as_str()),
        strings(rows, |r| r.mid_rating.as_str()),
        strings(rows, |r| r.late_rating.as_str()),
    ];

    RecordBatch::try_new(build_schema(), columns).map_err(|e| AppError::ExportError(e.to_string()))
}

/// Rewrites the whole file; there is no append mode.
pub fn write_parquet(path: &Path, rows: &[RatingRow]) -> Result<(), AppError> {
    let batch = to_record_batch(rows)?;

    ensure_parent(path).map_err(|e| AppError::write_failed(path, e))?;
    let file = File::create(path).map_err(|e| AppError::write_failed(path, e))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props))
            .map_err(|e| AppError::write_failed(path, e))?;
    writer.write(&batch).map_err(|e| AppError::write_failed(path, e))?;
    writer.close().map_err(|e| AppError::write_failed(path, e))?;
    Ok(())
}
