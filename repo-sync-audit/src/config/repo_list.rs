//! Repo list document: the parent and its derivatives.

use super::{ConfigError, RepoRef};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Raw repo list as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RepoListDocument {
    /// Default owner for bare repository names.
    owner: Option<String>,

    /// Parent repository.
    parent: String,

    /// Derivative repositories.
    #[serde(default)]
    derivatives: Vec<DerivativeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DerivativeEntry {
    name: String,
    category: Option<String>,
}

/// A derivative repository and the file category it tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivative {
    /// Repository identity.
    pub repo: RepoRef,

    /// Category naming its extra files; `None` tracks only the common set.
    pub category: Option<String>,
}

/// Validated repo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoList {
    /// Parent repository every derivative is compared against.
    pub parent: RepoRef,

    /// Derivatives in document order, without duplicates.
    pub derivatives: Vec<Derivative>,
}

impl RepoList {
    /// Loads and validates a repo list document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unparsable, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let document: RepoListDocument = super::parse_document(path)?;
        Self::from_document(document, path)
    }

    fn from_document(document: RepoListDocument, path: &Path) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        let owner = document.owner.as_deref();
        let parent = RepoRef::parse(&document.parent, owner).map_err(|e| invalid(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut derivatives = Vec::with_capacity(document.derivatives.len());
        for entry in document.derivatives {
            let repo = RepoRef::parse(&entry.name, owner).map_err(|e| invalid(e.to_string()))?;

            if repo == parent {
                return Err(invalid(format!("derivative '{repo}' is the parent repository")));
            }
            if !seen.insert(repo.clone()) {
                return Err(invalid(format!("derivative '{repo}' is listed more than once")));
            }

            let category = entry
                .category
                .map(|category| category.trim().to_string())
                .filter(|category| !category.is_empty());
            derivatives.push(Derivative { repo, category });
        }

        Ok(Self {
            parent,
            derivatives,
        })
    }
}
