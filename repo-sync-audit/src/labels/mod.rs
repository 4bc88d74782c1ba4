//! Detection of open, labeled sync pull requests.

mod status;

pub use status::{LabelCheckResult, LabelStatus};

use crate::api::{ApiError, ForgeApi, IssueSummary};
use crate::config::RepoRef;
use crate::fingerprints::DEFAULT_REQUEST_TIMEOUT;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Label marking a pull request that syncs files from the parent.
pub const DEFAULT_LABEL: &str = "kind/sync";

/// Issues requested per listing call.
pub const DEFAULT_PER_PAGE: u8 = 100;

/// What to look for and how long to wait for it.
#[derive(Debug, Clone)]
pub struct LabelQuery {
    /// Label filter applied server-side.
    pub label: String,

    /// Page size of the single listing call.
    pub per_page: u8,

    /// Deadline for the listing call.
    pub timeout: Duration,
}

impl Default for LabelQuery {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Checks whether `repo` has an open pull request carrying the query label.
///
/// Only the first page is read. Entries are inspected in server order and
/// the first one that is a pull request wins; any further labeled pull
/// requests are not reported.
pub async fn scan_labels(api: &dyn ForgeApi, repo: &RepoRef, query: &LabelQuery) -> LabelCheckResult {
    debug!(repo = %repo, label = %query.label, "Scanning for labeled pull request");

    let call = api.list_open_issues(repo, &query.label, query.per_page);
    let listing = match tokio::time::timeout(query.timeout, call).await {
        Ok(listing) => listing,
        Err(_) => Err(ApiError::Timeout {
            millis: query.timeout.as_millis() as u64,
        }),
    };

    let status = match listing {
        Ok(issues) => {
            if issues.len() >= usize::from(query.per_page) {
                warn!(
                    repo = %repo,
                    per_page = query.per_page,
                    "Listing filled a whole page; later entries are not inspected"
                );
            }
            match first_pull_request(&issues) {
                Some(pr) => {
                    info!(repo = %repo, pr_number = pr.number, "Labeled pull request already open");
                    LabelStatus::Found {
                        number: pr.number,
                        title: pr.title.clone(),
                    }
                }
                None => LabelStatus::NotFound,
            }
        }
        Err(error) => {
            warn!(repo = %repo, error = %error, "Label scan failed");
            LabelStatus::Failed { error }
        }
    };

    LabelCheckResult {
        repo: repo.clone(),
        status,
    }
}

/// Returns the first entry that is a pull request rather than a plain issue.
fn first_pull_request(issues: &[IssueSummary]) -> Option<&IssueSummary> {
    issues.iter().find(|issue| issue.is_pull_request)
}
