//! Comparison of a derivative's fingerprints against the parent's.

mod verdict;

pub use verdict::{DriftStatus, DriftVerdict};

use crate::fingerprints::{FileFingerprint, RepoFingerprintSet};
use std::collections::HashMap;

/// Compares `candidate` against `parent`, path by path.
///
/// Emits one verdict per entry of `parent`, in the parent's order. Entries
/// are joined on path, never on position, so the order of either input does
/// not affect any verdict. For each parent entry:
///
/// 1. no candidate entry with that path: [`DriftStatus::PathAbsentInTarget`]
/// 2. parent entry failed: [`DriftStatus::SourceError`]
/// 3. candidate entry failed: [`DriftStatus::TargetError`]
/// 4. otherwise [`DriftStatus::Match`] if the fingerprints are equal, else
///    [`DriftStatus::Mismatch`]
#[must_use]
pub fn compare(parent: &RepoFingerprintSet, candidate: &RepoFingerprintSet) -> Vec<DriftVerdict> {
    let mut by_path: HashMap<&str, &FileFingerprint> = HashMap::new();
    for entry in &candidate.fingerprints {
        by_path.entry(entry.path.as_str()).or_insert(entry);
    }

    parent
        .fingerprints
        .iter()
        .map(|source| DriftVerdict {
            repo: candidate.repo.clone(),
            path: source.path.clone(),
            status: verdict_for(source, by_path.get(source.path.as_str()).copied()),
        })
        .collect()
}

fn verdict_for(source: &FileFingerprint, target: Option<&FileFingerprint>) -> DriftStatus {
    let Some(target) = target else {
        return DriftStatus::PathAbsentInTarget;
    };

    match (&source.fingerprint, &target.fingerprint) {
        (Err(_), _) => DriftStatus::SourceError,
        (Ok(_), Err(_)) => DriftStatus::TargetError,
        (Ok(expected), Ok(actual)) if expected == actual => DriftStatus::Match,
        (Ok(_), Ok(_)) => DriftStatus::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::RepoRef;

    fn set(name: &str, entries: Vec<FileFingerprint>) -> RepoFingerprintSet {
        RepoFingerprintSet::new(RepoRef::new("org", name), entries)
    }

    fn statuses(verdicts: &[DriftVerdict]) -> Vec<(&str, DriftStatus)> {
        verdicts
            .iter()
            .map(|verdict| (verdict.path.as_str(), verdict.status))
            .collect()
    }

    #[test]
    fn reports_match_and_mismatch() {
        let parent = set(
            "parent",
            vec![FileFingerprint::new("a.txt", "h1"), FileFingerprint::new("b.txt", "h2")],
        );
        let candidate = set(
            "svc",
            vec![FileFingerprint::new("a.txt", "h1"), FileFingerprint::new("b.txt", "h9")],
        );

        let verdicts = compare(&parent, &candidate);

        assert_eq!(
            statuses(&verdicts),
            vec![("a.txt", DriftStatus::Match), ("b.txt", DriftStatus::Mismatch)]
        );
        assert!(verdicts.iter().all(|v| v.repo == RepoRef::new("org", "svc")));
    }

    #[test]
    fn reports_path_absent_in_target() {
        let parent = set(
            "parent",
            vec![FileFingerprint::new("a.txt", "h1"), FileFingerprint::new("b.txt", "h2")],
        );
        let candidate = set("svc", vec![FileFingerprint::new("a.txt", "h1")]);

        let verdicts = compare(&parent, &candidate);

        assert_eq!(
            statuses(&verdicts),
            vec![
                ("a.txt", DriftStatus::Match),
                ("b.txt", DriftStatus::PathAbsentInTarget)
            ]
        );
    }

    #[test]
    fn reports_source_and_target_errors() {
        let parent = set(
            "parent",
            vec![
                FileFingerprint::failed("a.txt", ApiError::status(404, "Not Found")),
                FileFingerprint::new("b.txt", "h2"),
                FileFingerprint::failed("c.txt", ApiError::Timeout { millis: 10 }),
            ],
        );
        let candidate = set(
            "svc",
            vec![
                FileFingerprint::new("a.txt", "h1"),
                FileFingerprint::failed("b.txt", ApiError::status(404, "Not Found")),
                FileFingerprint::failed("c.txt", ApiError::status(404, "Not Found")),
            ],
        );

        let verdicts = compare(&parent, &candidate);

        assert_eq!(
            statuses(&verdicts),
            vec![
                ("a.txt", DriftStatus::SourceError),
                ("b.txt", DriftStatus::TargetError),
                ("c.txt", DriftStatus::SourceError)
            ]
        );
    }

    #[test]
    fn verdicts_do_not_depend_on_input_order() {
        let entries = vec![
            FileFingerprint::new("a.txt", "h1"),
            FileFingerprint::new("b.txt", "h2"),
            FileFingerprint::failed("c.txt", ApiError::status(500, "boom")),
            FileFingerprint::new("d.txt", "h4"),
        ];
        let candidate_entries = vec![
            FileFingerprint::new("a.txt", "h1"),
            FileFingerprint::new("b.txt", "other"),
            FileFingerprint::new("c.txt", "h3"),
        ];

        let mut expected = compare(&set("parent", entries.clone()), &set("svc", candidate_entries.clone()));
        expected.sort();

        let mut reversed_parent = entries.clone();
        reversed_parent.reverse();
        let mut rotated_candidate = candidate_entries.clone();
        rotated_candidate.rotate_left(1);

        for (parent, candidate) in [
            (reversed_parent.clone(), candidate_entries.clone()),
            (entries.clone(), rotated_candidate.clone()),
            (reversed_parent, rotated_candidate),
        ] {
            let mut verdicts = compare(&set("parent", parent), &set("svc", candidate));
            verdicts.sort();
            assert_eq!(verdicts, expected);
        }
    }

    #[test]
    fn empty_parent_yields_no_verdicts() {
        let candidate = set("svc", vec![FileFingerprint::new("a.txt", "h1")]);
        assert!(compare(&set("parent", Vec::new()), &candidate).is_empty());
    }
}
