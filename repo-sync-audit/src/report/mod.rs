//! Audit report types and helpers.

mod run_summary;
mod section;

pub use run_summary::RunSummary;
pub use section::RepoSection;

use crate::config::RepoRef;
use serde::Serialize;

/// Result of a complete audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Parent repository the fleet was compared against.
    pub parent: RepoRef,

    /// Ref the files were read from.
    pub git_ref: String,

    /// Label identifying sync pull requests.
    pub label: String,

    /// One section per derivative, in configuration order.
    pub sections: Vec<RepoSection>,

    /// Totals over all sections.
    pub summary: RunSummary,
}

impl AuditReport {
    /// Builds a report and its summary from the given sections.
    #[must_use]
    pub fn new(parent: RepoRef, git_ref: String, label: String, sections: Vec<RepoSection>) -> Self {
        let mut summary = RunSummary::new();
        for section in &sections {
            summary.record_section(section);
        }
        Self {
            parent,
            git_ref,
            label,
            sections,
            summary,
        }
    }

    /// Looks up the section of `repo`.
    #[must_use]
    pub fn section(&self, repo: &RepoRef) -> Option<&RepoSection> {
        self.sections.iter().find(|section| &section.repo == repo)
    }
}
