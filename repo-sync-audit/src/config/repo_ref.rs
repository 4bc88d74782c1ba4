//! Owner-qualified repository identity.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A repository name that could not be resolved to `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid repository '{input}': {reason}")]
pub struct InvalidRepoRef {
    /// The name as written in the document.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Identifies a repository by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Creates a reference from its parts without validation.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Resolves `owner/name`, or a bare `name` qualified by `default_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRepoRef`] if a part is empty, the name has more than
    /// one separator, or a bare name has no owner to fall back on.
    pub fn parse(input: &str, default_owner: Option<&str>) -> Result<Self, InvalidRepoRef> {
        let invalid = |reason: &str| InvalidRepoRef {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (owner, name) = match trimmed.split_once('/') {
            Some((owner, name)) => (owner, name),
            None => {
                let owner = default_owner
                    .map(str::trim)
                    .filter(|owner| !owner.is_empty())
                    .ok_or_else(|| invalid("bare name requires a default owner"))?;
                (owner, trimmed)
            }
        };

        if owner.is_empty() || name.is_empty() {
            return Err(invalid("owner and name must not be empty"));
        }
        if name.contains('/') {
            return Err(invalid("expected 'owner/name'"));
        }
        if owner.chars().chain(name.chars()).any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        Ok(Self::new(owner, name))
    }

    /// Full repository name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepoRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
