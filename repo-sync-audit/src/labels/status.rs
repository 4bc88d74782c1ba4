//! Label scan result types.

use crate::api::ApiError;
use crate::config::RepoRef;
use serde::Serialize;

/// Outcome of looking for a labeled pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelStatus {
    /// An open pull request carries the label.
    Found {
        /// Pull request number.
        number: u64,
        /// Pull request title.
        title: String,
    },

    /// No open pull request carries the label.
    NotFound,

    /// The lookup failed.
    Failed {
        /// Error reported by the remote call.
        error: ApiError,
    },
}

impl LabelStatus {
    /// Returns the status as a string for display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::NotFound => "not_found",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Label scan result for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCheckResult {
    /// Repository that was scanned.
    pub repo: RepoRef,

    /// What the scan found.
    #[serde(flatten)]
    pub status: LabelStatus,
}

impl LabelCheckResult {
    /// Returns true if a labeled pull request is open.
    #[must_use]
    pub fn has_labeled_pr(&self) -> bool {
        matches!(self.status, LabelStatus::Found { .. })
    }

    /// Number of the labeled pull request, if found.
    #[must_use]
    pub fn pr_number(&self) -> Option<u64> {
        match &self.status {
            LabelStatus::Found { number, .. } => Some(*number),
            _ => None,
        }
    }

    /// Title of the labeled pull request, if found.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match &self.status {
            LabelStatus::Found { title, .. } => Some(title),
            _ => None,
        }
    }

    /// Error of a failed scan.
    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        match &self.status {
            LabelStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}
