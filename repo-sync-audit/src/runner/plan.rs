//! Resolved audit targets.

use crate::config::{FileList, RepoList, RepoRef};
use std::collections::HashSet;

/// A derivative together with the paths it tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRepo {
    /// Derivative repository.
    pub repo: RepoRef,

    /// Tracked paths, common set first.
    pub files: Vec<String>,
}

/// The parent and every derivative with its resolved file set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPlan {
    /// Parent repository.
    pub parent: RepoRef,

    /// Derivatives in configuration order.
    pub derivatives: Vec<PlannedRepo>,
}

impl AuditPlan {
    /// Resolves every derivative's file set from its category.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first derivative whose category is not
    /// defined in the file list.
    pub fn resolve(repos: &RepoList, files: &FileList) -> Result<Self, String> {
        let derivatives = repos
            .derivatives
            .iter()
            .map(|derivative| {
                let category = derivative.category.as_deref();
                files
                    .file_set(category)
                    .map(|files| PlannedRepo {
                        repo: derivative.repo.clone(),
                        files,
                    })
                    .map_err(|missing| {
                        format!(
                            "category '{missing}' used by '{}' is not defined",
                            derivative.repo
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            parent: repos.parent.clone(),
            derivatives,
        })
    }

    /// Returns the derivatives in the order they were configured.
    pub fn repos(&self) -> Vec<RepoRef> {
        self.derivatives.iter().map(|planned| planned.repo.clone()).collect()
    }

    /// Returns the planned entry for `repo`.
    #[must_use]
    pub fn get(&self, repo: &RepoRef) -> Option<&PlannedRepo> {
        self.derivatives.iter().find(|planned| &planned.repo == repo)
    }

    /// Ordered union of the file sets of `repos`; what the parent must provide.
    #[must_use]
    pub fn parent_files(&self, repos: &[RepoRef]) -> Vec<String> {
        let mut seen = HashSet::new();
        repos
            .iter()
            .filter_map(|repo| self.get(repo))
            .flat_map(|planned| planned.files.iter())
            .filter(|path| seen.insert(path.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Derivative;

    fn repo_list() -> RepoList {
        RepoList {
            parent: RepoRef::new("org", "template"),
            derivatives: vec![
                Derivative {
                    repo: RepoRef::new("org", "plain"),
                    category: None,
                },
                Derivative {
                    repo: RepoRef::new("org", "irsa"),
                    category: Some("addon-irsa".to_string()),
                },
            ],
        }
    }

    fn file_list() -> FileList {
        FileList::from_categories([
            ("common", vec!["ci.yml", "LICENSE"]),
            ("addon-irsa", vec!["iam.tf"]),
        ])
    }

    #[test]
    fn resolves_file_sets_per_category() {
        let plan = AuditPlan::resolve(&repo_list(), &file_list()).unwrap();

        assert_eq!(plan.parent, RepoRef::new("org", "template"));
        assert_eq!(plan.derivatives[0].files, vec!["ci.yml", "LICENSE"]);
        assert_eq!(plan.derivatives[1].files, vec!["ci.yml", "LICENSE", "iam.tf"]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let files = FileList::from_categories([("common", vec!["ci.yml"])]);
        let error = AuditPlan::resolve(&repo_list(), &files).unwrap_err();
        assert!(error.contains("addon-irsa"));
        assert!(error.contains("org/irsa"));
    }

    #[test]
    fn parent_files_are_union_of_selected_repos() {
        let plan = AuditPlan::resolve(&repo_list(), &file_list()).unwrap();

        let only_plain = plan.parent_files(&[RepoRef::new("org", "plain")]);
        assert_eq!(only_plain, vec!["ci.yml", "LICENSE"]);

        let both = plan.parent_files(&plan.repos());
        assert_eq!(both, vec!["ci.yml", "LICENSE", "iam.tf"]);

        assert!(plan.parent_files(&[]).is_empty());
    }
}
