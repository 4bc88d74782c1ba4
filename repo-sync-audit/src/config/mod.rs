//! Configuration loading.
//!
//! Two documents drive an audit: the repo list (parent plus derivatives,
//! each with an optional category) and the file list (tracked paths per
//! category). Both are YAML by default; a `.toml` extension selects TOML.
//!
//! ```text
//! # repos.yaml                     # files.yaml
//! owner: lablabs                   common:
//! parent: template                   - .github/workflows/ci.yml
//! derivatives:                     addon-irsa:
//!   - name: svc                      - iam.tf
//!     category: addon-irsa
//! ```

mod error;
mod file_list;
mod repo_list;
mod repo_ref;

pub use error::ConfigError;
pub use file_list::{FileList, COMMON_CATEGORY};
pub use repo_list::{Derivative, RepoList};
pub use repo_ref::{InvalidRepoRef, RepoRef};

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the repo list.
pub const DEFAULT_REPOS_PATH: &str = "configs/repos.yaml";

/// Default location of the file list.
pub const DEFAULT_FILES_PATH: &str = "configs/files.yaml";

/// Loads the repo list document.
///
/// # Errors
///
/// Returns [`ConfigError`] if the document is missing, malformed, or invalid.
pub fn load_repo_list(path: &Path) -> Result<RepoList, ConfigError> {
    let list = RepoList::load(path)?;
    info!(
        path = %path.display(),
        parent = %list.parent,
        derivatives = list.derivatives.len(),
        "Loaded repo list"
    );
    Ok(list)
}

/// Loads the file list document.
///
/// # Errors
///
/// Returns [`ConfigError`] if the document is missing, malformed, or invalid.
pub fn load_file_list(path: &Path) -> Result<FileList, ConfigError> {
    let list = FileList::load(path)?;
    info!(path = %path.display(), "Loaded file list");
    Ok(list)
}

/// Reads and deserializes a document, choosing the format by extension.
fn parse_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::MissingFile { path: path_str });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path_str.clone(),
        source: e,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    debug!(path = %path_str, toml = is_toml, "Parsing document");

    if is_toml {
        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path_str,
            source: e,
        })
    } else {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlError {
            path: path_str,
            source: e,
        })
    }
}
