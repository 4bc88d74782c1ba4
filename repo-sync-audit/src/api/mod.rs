//! Remote API boundary.
//!
//! The audit only needs two read-only endpoints: an issue listing filtered
//! by label and state, and file content metadata at a ref. [`ForgeApi`]
//! describes those calls so the scanning components can run against GitHub
//! via [`GitHubApi`] or against an in-memory fake in tests.

mod error;
mod github;

pub use error::ApiError;
pub use github::GitHubApi;

use crate::config::RepoRef;
use async_trait::async_trait;
use serde::Serialize;

/// One entry of an issue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    /// Issue or pull request number.
    pub number: u64,

    /// Issue or pull request title.
    pub title: String,

    /// Whether the entry carries a pull-request reference.
    pub is_pull_request: bool,
}

/// Metadata of a single file at a ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentMetadata {
    /// File name.
    pub name: String,

    /// Path relative to the repository root.
    pub path: String,

    /// Content fingerprint computed by the server (blob SHA).
    pub sha: String,
}

/// Read-only operations the audit performs against the hosting service.
///
/// Implementations hold no per-call state and are shared across every
/// concurrent task of a run.
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Lists open issues and pull requests of `repo` carrying `label`.
    ///
    /// Returns a single page of at most `per_page` entries in server order.
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        label: &str,
        per_page: u8,
    ) -> Result<Vec<IssueSummary>, ApiError>;

    /// Fetches the metadata of the file at `path` on `git_ref`.
    async fn content_metadata(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<ContentMetadata, ApiError>;
}
