//! Content fingerprint retrieval.
//!
//! [`fetch_fingerprint`] asks the remote API for one file's fingerprint;
//! [`repo_checksums`] runs it for every tracked path of a repository at once
//! and gathers the results into a [`RepoFingerprintSet`].

mod fingerprint;

pub use fingerprint::{FileFingerprint, RepoFingerprintSet};

use crate::api::{ApiError, ForgeApi};
use crate::config::RepoRef;
use crate::fanout::fan_out;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// Ref used when none is configured.
pub const DEFAULT_REF: &str = "main";

/// Deadline applied to each remote call when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every fingerprint fetch of a run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Branch or tag the files are read from.
    pub git_ref: String,

    /// Deadline for a single remote call.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            git_ref: DEFAULT_REF.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Fetches the content fingerprint of one file.
///
/// Issues exactly one remote call and never retries. Any failure, including
/// the deadline expiring, is returned inside the [`FileFingerprint`].
pub async fn fetch_fingerprint(
    api: &dyn ForgeApi,
    repo: &RepoRef,
    path: &str,
    options: &FetchOptions,
) -> FileFingerprint {
    debug!(repo = %repo, path, git_ref = %options.git_ref, "Fetching fingerprint");

    let call = api.content_metadata(repo, path, &options.git_ref);
    let outcome = match tokio::time::timeout(options.timeout, call).await {
        Ok(Ok(metadata)) => Ok(metadata.sha),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ApiError::Timeout {
            millis: options.timeout.as_millis() as u64,
        }),
    };

    if let Err(e) = &outcome {
        warn!(repo = %repo, path, error = %e, "Failed to fetch fingerprint");
    }

    FileFingerprint {
        path: path.to_string(),
        fingerprint: outcome,
    }
}

/// Fetches fingerprints for every path of a repository concurrently.
///
/// One task is spawned per path with no concurrency cap; the file sets are
/// small and bounded by configuration. All tasks are awaited, a failing path
/// never cancels its siblings, and the returned set holds exactly one entry
/// per input path, in input order.
pub async fn repo_checksums(
    api: &Arc<dyn ForgeApi>,
    repo: &RepoRef,
    paths: &[String],
    options: &FetchOptions,
) -> RepoFingerprintSet {
    let span = info_span!("checksums", repo = %repo, files = paths.len());

    async {
        let slots = fan_out(paths.to_vec(), |path| {
            let api = Arc::clone(api);
            let repo = repo.clone();
            let options = options.clone();
            async move { fetch_fingerprint(api.as_ref(), &repo, &path, &options).await }
        })
        .await;

        let fingerprints: Vec<FileFingerprint> = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    FileFingerprint::failed(
                        path.clone(),
                        ApiError::TaskFailed {
                            message: "fingerprint task stopped before reporting".to_string(),
                        },
                    )
                })
            })
            .collect();

        let set = RepoFingerprintSet::new(repo.clone(), fingerprints);
        info!(failed = set.failed_count(), "Collected fingerprints");
        set
    }
    .instrument(span)
    .await
}
