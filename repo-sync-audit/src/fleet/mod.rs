//! Fleet-wide label scan and partitioning.
//!
//! The first stage of an audit: every derivative is checked for an open sync
//! pull request at once, and the fleet is split into repositories that are
//! already being synced, repositories that need a file comparison, and
//! repositories whose scan failed.

use crate::api::{ApiError, ForgeApi};
use crate::config::RepoRef;
use crate::fanout::fan_out;
use crate::labels::{scan_labels, LabelCheckResult, LabelQuery, LabelStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Partitioned outcome of a fleet scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetScan {
    /// One result per scanned repository, in input order.
    pub results: Vec<LabelCheckResult>,

    /// Repositories with an open labeled pull request.
    pub pending: Vec<RepoRef>,

    /// Repositories without one, to be compared against the parent.
    pub needs_check: Vec<RepoRef>,

    /// Repositories whose scan failed; in neither of the other lists.
    pub errors: Vec<(RepoRef, ApiError)>,
}

impl FleetScan {
    /// Splits label results into pending, needs-check and failed repositories.
    #[must_use]
    pub fn partition(results: Vec<LabelCheckResult>) -> Self {
        let mut scan = Self::default();
        for result in &results {
            match &result.status {
                LabelStatus::Found { .. } => scan.pending.push(result.repo.clone()),
                LabelStatus::NotFound => scan.needs_check.push(result.repo.clone()),
                LabelStatus::Failed { error } => {
                    scan.errors.push((result.repo.clone(), error.clone()))
                }
            }
        }
        scan.results = results;
        scan
    }

    /// Looks up the scan result of `repo`.
    #[must_use]
    pub fn result_for(&self, repo: &RepoRef) -> Option<&LabelCheckResult> {
        self.results.iter().find(|result| &result.repo == repo)
    }
}

/// Scans every repository for an open labeled pull request concurrently.
///
/// Repeated repositories are scanned once. Returns only after every scan has
/// finished.
pub async fn scan_fleet(api: &Arc<dyn ForgeApi>, repos: &[RepoRef], query: &LabelQuery) -> FleetScan {
    let mut seen = HashSet::new();
    let unique: Vec<RepoRef> = repos
        .iter()
        .filter(|repo| seen.insert(*repo))
        .cloned()
        .collect();

    let span = info_span!("fleet_scan", repos = unique.len(), label = %query.label);

    async {
        let slots = fan_out(unique.clone(), |repo| {
            let api = Arc::clone(api);
            let query = query.clone();
            async move { scan_labels(api.as_ref(), &repo, &query).await }
        })
        .await;

        let results: Vec<LabelCheckResult> = slots
            .into_iter()
            .zip(unique)
            .map(|(slot, repo)| {
                slot.unwrap_or_else(|| LabelCheckResult {
                    repo,
                    status: LabelStatus::Failed {
                        error: ApiError::TaskFailed {
                            message: "label scan task stopped before reporting".to_string(),
                        },
                    },
                })
            })
            .collect();

        let scan = FleetScan::partition(results);
        info!(
            pending = scan.pending.len(),
            needs_check = scan.needs_check.len(),
            failed = scan.errors.len(),
            "Fleet scan complete"
        );
        scan
    }
    .instrument(span)
    .await
}
