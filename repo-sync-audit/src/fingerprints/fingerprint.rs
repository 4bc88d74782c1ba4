//! Fingerprint result types.

use crate::api::ApiError;
use crate::config::RepoRef;
use serde::Serialize;
use std::collections::HashMap;

/// Fingerprint of one file, or the error that prevented retrieving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFingerprint {
    /// Path relative to the repository root.
    pub path: String,

    /// Content fingerprint on success.
    pub fingerprint: Result<String, ApiError>,
}

impl FileFingerprint {
    /// Creates a successful fingerprint.
    pub fn new(path: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fingerprint: Ok(fingerprint.into()),
        }
    }

    /// Creates a failed fingerprint.
    pub fn failed(path: impl Into<String>, error: ApiError) -> Self {
        Self {
            path: path.into(),
            fingerprint: Err(error),
        }
    }

    /// Returns the fingerprint if it was retrieved.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.fingerprint.as_deref().ok()
    }

    /// Returns the error if retrieval failed.
    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        self.fingerprint.as_ref().err()
    }
}

/// All fingerprints collected for one repository.
///
/// Contains exactly one entry per requested path; failed paths keep their
/// entry with the error inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFingerprintSet {
    /// Repository the fingerprints belong to.
    pub repo: RepoRef,

    /// One entry per requested path.
    pub fingerprints: Vec<FileFingerprint>,
}

impl RepoFingerprintSet {
    /// Creates a set from already collected fingerprints.
    #[must_use]
    pub fn new(repo: RepoRef, fingerprints: Vec<FileFingerprint>) -> Self {
        Self { repo, fingerprints }
    }

    /// Looks up the entry for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileFingerprint> {
        self.fingerprints.iter().find(|entry| entry.path == path)
    }

    /// Number of entries that carry an error.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.fingerprints
            .iter()
            .filter(|entry| entry.fingerprint.is_err())
            .count()
    }

    /// Returns a copy holding only the entries for `paths`, in that order.
    ///
    /// Paths this set has no entry for are skipped.
    #[must_use]
    pub fn restricted_to(&self, paths: &[String]) -> Self {
        let mut by_path: HashMap<&str, &FileFingerprint> = HashMap::new();
        for entry in &self.fingerprints {
            by_path.entry(entry.path.as_str()).or_insert(entry);
        }

        Self {
            repo: self.repo.clone(),
            fingerprints: paths
                .iter()
                .filter_map(|path| by_path.get(path.as_str()).map(|entry| (*entry).clone()))
                .collect(),
        }
    }
}
