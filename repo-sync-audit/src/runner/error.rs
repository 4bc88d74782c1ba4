//! Runner error types and process exit codes.

use crate::config::ConfigError;

/// Exit code when drift was found and the caller asked to fail on it.
pub const EXIT_DRIFT: u8 = 1;

/// Exit code for critical failures without a dedicated code.
pub const EXIT_CRITICAL: u8 = 2;

/// Exit code when no credential is available.
pub const EXIT_MISSING_TOKEN: u8 = 3;

/// Exit code when the repo list cannot be loaded.
pub const EXIT_REPO_LIST: u8 = 4;

/// Exit code when the file list cannot be loaded.
pub const EXIT_FILE_LIST: u8 = 5;

/// Errors that abort a run before any remote call is made.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// No credential was provided.
    #[error("GitHub token is not set; provide --token or the GITHUB_TOKEN environment variable")]
    MissingToken,

    /// Repo list loading errors.
    #[error("Failed to load repo list: {0}")]
    RepoList(#[source] ConfigError),

    /// File list loading errors.
    #[error("Failed to load file list: {0}")]
    FileList(#[source] ConfigError),

    /// The configured ref is not a valid branch or tag name.
    #[error("Invalid git ref '{git_ref}': {message}")]
    InvalidRef { git_ref: String, message: String },

    /// The configured API root is not a usable URL.
    #[error("Invalid API URL '{url}': {message}")]
    InvalidApiUrl { url: String, message: String },

    /// The configured page size is outside the accepted range.
    #[error("Invalid page size {0}: must be between 1 and 100")]
    InvalidPageSize(u8),

    /// The per-call deadline is zero, which would fail every request.
    #[error("Invalid request timeout: must be greater than zero")]
    InvalidTimeout,

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}

impl RunnerError {
    /// Returns the process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingToken => EXIT_MISSING_TOKEN,
            Self::RepoList(_) => EXIT_REPO_LIST,
            Self::FileList(_) => EXIT_FILE_LIST,
            Self::InvalidRef { .. }
            | Self::InvalidApiUrl { .. }
            | Self::InvalidPageSize(_)
            | Self::InvalidTimeout
            | Self::Octocrab(_) => EXIT_CRITICAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_causes_have_distinct_exit_codes() {
        let missing = ConfigError::MissingFile {
            path: "configs/repos.yaml".to_string(),
        };
        let codes = [
            RunnerError::MissingToken.exit_code(),
            RunnerError::RepoList(missing).exit_code(),
            RunnerError::FileList(ConfigError::MissingFile {
                path: "configs/files.yaml".to_string(),
            })
            .exit_code(),
            RunnerError::InvalidPageSize(0).exit_code(),
            RunnerError::InvalidTimeout.exit_code(),
        ];

        assert_eq!(
            codes,
            [EXIT_MISSING_TOKEN, EXIT_REPO_LIST, EXIT_FILE_LIST, EXIT_CRITICAL, EXIT_CRITICAL]
        );
        assert!(codes.iter().all(|code| *code != 0 && *code != EXIT_DRIFT));
    }
}
