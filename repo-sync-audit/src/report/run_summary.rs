//! Run summary types.

use super::section::RepoSection;
use crate::drift::DriftStatus;
use crate::labels::LabelStatus;
use serde::Serialize;

/// Summary of a complete audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of derivatives scanned for a sync pull request.
    pub repositories_scanned: usize,

    /// Number of derivatives with an open sync pull request.
    pub sync_pending: usize,

    /// Number of derivatives compared against the parent.
    pub compared: usize,

    /// Number of derivatives whose label scan failed.
    pub label_errors: usize,

    /// Number of identical files.
    pub files_matched: usize,

    /// Number of files whose content differs.
    pub files_mismatched: usize,

    /// Number of files the parent could not provide.
    pub source_errors: usize,

    /// Number of files the derivative could not provide.
    pub target_errors: usize,

    /// Number of files missing from a derivative's fingerprint set.
    pub paths_absent: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with one repository section.
    pub fn record_section(&mut self, section: &RepoSection) {
        self.repositories_scanned += 1;
        match section.label {
            LabelStatus::Found { .. } => self.sync_pending += 1,
            LabelStatus::NotFound => self.compared += 1,
            LabelStatus::Failed { .. } => self.label_errors += 1,
        }

        for verdict in &section.verdicts {
            match verdict.status {
                DriftStatus::Match => self.files_matched += 1,
                DriftStatus::Mismatch => self.files_mismatched += 1,
                DriftStatus::SourceError => self.source_errors += 1,
                DriftStatus::TargetError => self.target_errors += 1,
                DriftStatus::PathAbsentInTarget => self.paths_absent += 1,
            }
        }
    }

    /// Returns true if any compared file is not known to match.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.files_mismatched + self.source_errors + self.target_errors + self.paths_absent > 0
    }

    /// Returns true if every scan succeeded and every compared file matched.
    #[must_use]
    pub fn in_sync(&self) -> bool {
        self.label_errors == 0 && !self.has_drift()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::RepoRef;
    use crate::drift::DriftVerdict;

    fn verdict(path: &str, status: DriftStatus) -> DriftVerdict {
        DriftVerdict {
            repo: RepoRef::new("org", "svc"),
            path: path.to_string(),
            status,
        }
    }

    #[test]
    fn can_record_sections() {
        let mut summary = RunSummary::new();

        summary.record_section(&RepoSection {
            repo: RepoRef::new("org", "svc"),
            label: LabelStatus::NotFound,
            verdicts: vec![
                verdict("a.txt", DriftStatus::Match),
                verdict("b.txt", DriftStatus::Mismatch),
                verdict("c.txt", DriftStatus::PathAbsentInTarget),
            ],
        });
        summary.record_section(&RepoSection {
            repo: RepoRef::new("org", "pending"),
            label: LabelStatus::Found {
                number: 4,
                title: "sync".to_string(),
            },
            verdicts: Vec::new(),
        });

        assert_eq!(summary.repositories_scanned, 2);
        assert_eq!(summary.compared, 1);
        assert_eq!(summary.sync_pending, 1);
        assert_eq!(summary.files_matched, 1);
        assert_eq!(summary.files_mismatched, 1);
        assert_eq!(summary.paths_absent, 1);
        assert!(summary.has_drift());
        assert!(!summary.in_sync());
    }

    #[test]
    fn label_error_is_not_in_sync() {
        let mut summary = RunSummary::new();
        summary.record_section(&RepoSection {
            repo: RepoRef::new("org", "svc"),
            label: LabelStatus::Failed {
                error: ApiError::status(401, "Bad credentials"),
            },
            verdicts: Vec::new(),
        });

        assert!(!summary.has_drift());
        assert!(!summary.in_sync());
    }

    #[test]
    fn empty_run_is_in_sync() {
        assert!(RunSummary::new().in_sync());
    }
}
