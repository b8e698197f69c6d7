use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed input in {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("Failed to write {}: {reason}", .path.display())]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Request budget exhausted, please try again later")]
    RateLimited,

    #[error("Export error: {0}")]
    ExportError(String),
}

impl AppError {
    pub fn malformed(path: &Path, reason: impl ToString) -> Self {
        AppError::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write_failed(path: &Path, reason: impl ToString) -> Self {
        AppError::WriteFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
