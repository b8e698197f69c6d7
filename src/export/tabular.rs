use csv::Writer;
use std::path::Path;

use crate::analysis::ratings::RatingRow;
use crate::config::ensure_parent;
use crate::error::AppError;

/// Header is written even when there are no rows.
pub fn write_csv(path: &Path, rows: &[RatingRow]) -> Result<(), AppError> {
    ensure_parent(path).map_err(|e| AppError::write_failed(path, e))?;
    let mut wtr = Writer::from_path(path).map_err(|e| AppError::write_failed(path, e))?;

    wtr.write_record(RatingRow::COLUMNS)
        .map_err(|e| AppError::write_failed(path, e))?;

    for row in rows {
        wtr.write_record(row.to_record())
            .map_err(|e| AppError::write_failed(path, e))?;
    }

    wtr.flush().map_err(|e| AppError::write_failed(path, e))?;
    Ok(())
}
