use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::hero_stats::MatchEntry;
use crate::config::ensure_parent;
use crate::error::AppError;

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::InputNotFound(path.to_path_buf()),
        _ => AppError::malformed(path, e),
    })?;

    serde_json::from_str(&content).map_err(|e| AppError::malformed(path, e))
}

/// Like `load_json`, but a missing file yields `None`.
pub fn load_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    match load_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(AppError::InputNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes pretty JSON, replacing any existing file.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| AppError::write_failed(path, e))?;

    ensure_parent(path).map_err(|e| AppError::write_failed(path, e))?;
    fs::write(path, json).map_err(|e| AppError::write_failed(path, e))?;

    debug!(path = %path.display(), "wrote json");
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ArchivedMatch {
    pub match_id: i64,
    pub fetched_at: DateTime<Utc>,
    pub entries: Vec<MatchEntry>,
}

/// Every match fetched so far, most recently fetched first.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchArchive {
    pub last_updated: DateTime<Utc>,
    pub matches: Vec<ArchivedMatch>,
    #[serde(skip)]
    path: PathBuf,
}

impl MatchArchive {
    pub fn new(path: &Path) -> Self {
        MatchArchive {
            last_updated: Utc::now(),
            matches: Vec::new(),
            path: path.to_path_buf(),
        }
    }

    /// Loads the archive, starting empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        match load_json_optional::<MatchArchive>(path)? {
            Some(mut archive) => {
                archive.path = path.to_path_buf();
                Ok(archive)
            }
            None => Ok(MatchArchive::new(path)),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        save_json(&self.path, self)
    }

    pub fn contains(&self, match_id: i64) -> bool {
        self.matches.iter().any(|m| m.match_id == match_id)
    }

    /// Adds matches not already archived; returns how many were new.
    pub fn add_matches(&mut self, new_matches: Vec<ArchivedMatch>) -> usize {
        let mut existing_ids: HashSet<i64> = self.matches.iter().map(|m| m.match_id).collect();

        let mut added = 0;
        for new_match in new_matches {
            if existing_ids.insert(new_match.match_id) {
                self.matches.push(new_match);
                added += 1;
            }
        }

        self.matches.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
        self.last_updated = Utc::now();
        added
    }

    pub fn entries(&self) -> Vec<MatchEntry> {
        self.matches
            .iter()
            .flat_map(|m| m.entries.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn archived(match_id: i64, minutes_ago: i64) -> ArchivedMatch {
        ArchivedMatch {
            match_id,
            fetched_at: Utc::now() - Duration::minutes(minutes_ago),
            entries: vec![MatchEntry {
                match_id: Some(match_id),
                hero_id: Some(1),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_json::<Vec<MatchEntry>>(&path).unwrap_err();
        assert!(matches!(err, AppError::InputNotFound(p) if p == path));
        assert!(load_json_optional::<Vec<MatchEntry>>(&path).unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<Vec<MatchEntry>>(&path).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
        assert!(load_json_optional::<Vec<MatchEntry>>(&path).is_err());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        save_json(&path, &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = load_json(&path).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn archive_deduplicates_and_orders_by_fetch_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.json");

        let mut archive = MatchArchive::load(&path).unwrap();
        assert!(archive.matches.is_empty());

        assert_eq!(archive.add_matches(vec![archived(1, 30), archived(2, 10)]), 2);
        assert_eq!(archive.add_matches(vec![archived(2, 0), archived(3, 5)]), 1);
        archive.save().unwrap();

        let reloaded = MatchArchive::load(&path).unwrap();
        let ids: Vec<i64> = reloaded.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(reloaded.contains(2));
        assert_eq!(reloaded.entries().len(), 3);
    }
}
