//! Reconciliation of the live and historical job sources
//!
//! The backend keeps recent jobs in memory and archives them to a database.
//! A job can show up in either list or in both, with the live copy being the
//! fresher one. This module merges the two into one deduplicated set ordered
//! newest first.

use std::collections::HashMap;

use jobdeck_client::JobSource;
use jobdeck_core::domain::job::Job;
use tracing::debug;

use crate::error::{ReconciliationError, SourceKind};

/// Merge live and historical jobs by id
///
/// Live jobs are inserted first and win every conflict. Historical jobs only
/// fill in ids the live set does not have. The result is sorted by
/// `created_at`, newest first; the sort is stable, so jobs created at the same
/// instant keep insertion order (live before historical, then fetch order).
pub fn merge_jobs(live: Vec<Job>, historical: Vec<Job>) -> Vec<Job> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(live.len() + historical.len());
    let mut merged: Vec<Job> = Vec::with_capacity(live.len() + historical.len());

    for job in live {
        match positions.get(&job.id) {
            // A repeated live id replaces the value but keeps its first slot
            Some(&index) => merged[index] = job,
            None => {
                positions.insert(job.id.clone(), merged.len());
                merged.push(job);
            }
        }
    }

    for job in historical {
        if !positions.contains_key(&job.id) {
            positions.insert(job.id.clone(), merged.len());
            merged.push(job);
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}

/// Fetch both sources concurrently and merge them
///
/// Fails as a whole if either fetch fails; no partial merge is returned.
pub async fn reconcile(source: &dyn JobSource) -> Result<Vec<Job>, ReconciliationError> {
    let live = async {
        source
            .fetch_live_jobs()
            .await
            .map_err(|e| ReconciliationError::new(SourceKind::Live, e))
    };
    let historical = async {
        source
            .fetch_historical_jobs()
            .await
            .map_err(|e| ReconciliationError::new(SourceKind::Historical, e))
    };

    let (live, historical) = tokio::try_join!(live, historical)?;
    let (live_count, historical_count) = (live.len(), historical.len());

    let merged = merge_jobs(live, historical);
    debug!(
        "Reconciled {} live and {} historical job(s) into {}",
        live_count,
        historical_count,
        merged.len()
    );

    Ok(merged)
}
