//! Per-repository report sections.

use crate::config::RepoRef;
use crate::drift::DriftVerdict;
use crate::labels::LabelStatus;
use serde::Serialize;

/// Everything the audit learned about one derivative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSection {
    /// Derivative repository.
    pub repo: RepoRef,

    /// Outcome of the label scan.
    pub label: LabelStatus,

    /// File verdicts; empty unless the repository was compared.
    pub verdicts: Vec<DriftVerdict>,
}

impl RepoSection {
    /// Returns true if the files of this repository were compared.
    #[must_use]
    pub fn was_compared(&self) -> bool {
        matches!(self.label, LabelStatus::NotFound)
    }

    /// Number of verdicts other than a match.
    #[must_use]
    pub fn drift_count(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|verdict| verdict.status.is_drift())
            .count()
    }
}
