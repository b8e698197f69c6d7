use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use crate::api::models::LiveMatch;
use crate::api::LiveSource;
use crate::error::AppError;
use crate::store::save_json;

/// League ids to keep; empty keeps every match.
#[derive(Debug, Clone, Default)]
pub struct LiveFilter {
    pub league_ids: Vec<i64>,
}

impl LiveFilter {
    pub fn matches(&self, live: &LiveMatch) -> bool {
        self.league_ids.is_empty()
            || live
                .league_id()
                .map(|id| self.league_ids.contains(&id))
                .unwrap_or(false)
    }
}

pub fn live_match_path(out_dir: &Path, match_id: i64) -> std::path::PathBuf {
    out_dir.join(format!("live_{}.json", match_id))
}

/// One poll cycle: writes a file per in-scope match, returns how many.
pub fn poll_once(
    source: &dyn LiveSource,
    filter: &LiveFilter,
    out_dir: &Path,
) -> Result<usize, AppError> {
    let running = source.running_matches()?;
    let mut written = 0;

    for live in running.iter().filter(|m| filter.matches(m)) {
        save_json(&live_match_path(out_dir, live.id), live)?;
        written += 1;
    }

    info!(running = running.len(), written, "live poll finished");
    Ok(written)
}

/// Polls until the process is interrupted. A failed cycle is logged and the
/// loop carries on after the usual interval.
pub fn run_poller(
    source: &dyn LiveSource,
    filter: &LiveFilter,
    out_dir: &Path,
    interval: Duration,
) -> ! {
    info!(out_dir = %out_dir.display(), interval_secs = interval.as_secs(), "starting live poller");
    loop {
        if let Err(e) = poll_once(source, filter, out_dir) {
            error!(error = %e, "live poll failed");
        }
        thread::sleep(interval);
    }
}
