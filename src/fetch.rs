use chrono::Utc;
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::api::models::HeroConstants;
use crate::api::StatsSource;
use crate::error::AppError;
use crate::rate_limit::RequestLog;
use crate::store::{ArchivedMatch, MatchArchive};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FetchSummary {
    pub listed: usize,
    pub fetched: usize,
    pub already_archived: usize,
    pub failed: usize,
    pub budget_exhausted: bool,
}

/// Only an exhausted budget is an error; a failed save is logged.
fn spend(budget: &mut RequestLog) -> Result<(), AppError> {
    if !budget.can_make_request() {
        return Err(AppError::RateLimited);
    }
    budget.record_request();
    if let Err(e) = budget.save() {
        warn!(api = %budget.api, error = %e, "failed to persist request log");
    }
    Ok(())
}

/// Hero constants are required by every later stage, so failure is fatal.
pub fn fetch_hero_constants(
    source: &dyn StatsSource,
    budget: &mut RequestLog,
) -> Result<HeroConstants, AppError> {
    spend(budget)?;
    let constants = source.hero_constants()?;
    info!(heroes = constants.len(), "hero constants fetched");
    Ok(constants)
}

/// Fetches details for up to `limit` listed pro matches that are not archived
/// yet. A failed detail call skips that match; an exhausted budget stops early.
pub fn fetch_new_matches(
    source: &dyn StatsSource,
    constants: &HeroConstants,
    archive: &mut MatchArchive,
    budget: &mut RequestLog,
    limit: usize,
    progress: &ProgressBar,
) -> Result<FetchSummary, AppError> {
    let mut summary = FetchSummary::default();

    spend(budget)?;
    let listed = source.pro_matches(limit)?;
    summary.listed = listed.len();

    let pending: Vec<i64> = listed
        .iter()
        .map(|m| m.match_id)
        .filter(|id| !archive.contains(*id))
        .collect();
    summary.already_archived = summary.listed - pending.len();

    progress.set_length(pending.len() as u64);
    let mut fetched = Vec::new();

    for match_id in pending {
        if spend(budget).is_err() {
            warn!(
                remaining = budget.get_remaining(),
                "request budget exhausted, stopping early"
            );
            summary.budget_exhausted = true;
            break;
        }

        match source.match_detail(match_id) {
            Ok(detail) => {
                fetched.push(ArchivedMatch {
                    match_id,
                    fetched_at: Utc::now(),
                    entries: detail.to_entries(constants),
                });
            }
            Err(e) => {
                warn!(match_id, error = %e, "failed to fetch match, skipping");
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    summary.fetched = archive.add_matches(fetched);
    Ok(summary)
}
