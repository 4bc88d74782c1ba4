//! Drift verdict types.

use crate::config::RepoRef;
use serde::Serialize;

/// Comparison outcome for one tracked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    /// Parent and derivative fingerprints are identical.
    Match,

    /// Fingerprints differ.
    Mismatch,

    /// The parent's fingerprint could not be retrieved.
    SourceError,

    /// The derivative's fingerprint could not be retrieved.
    TargetError,

    /// The derivative's set has no entry for the path.
    PathAbsentInTarget,
}

impl DriftStatus {
    /// Returns the status as a string for display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::SourceError => "source_error",
            Self::TargetError => "target_error",
            Self::PathAbsentInTarget => "path_absent_in_target",
        }
    }

    /// Returns true unless the path is known to be identical.
    #[must_use]
    pub fn is_drift(&self) -> bool {
        !matches!(self, Self::Match)
    }
}

/// Verdict for one path of one derivative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DriftVerdict {
    /// Derivative the verdict is about.
    pub repo: RepoRef,

    /// Tracked path.
    pub path: String,

    /// Comparison outcome.
    pub status: DriftStatus,
}
