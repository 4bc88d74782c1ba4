//! Runner configuration.

use super::RunnerError;
use crate::fingerprints::{FetchOptions, DEFAULT_REF, DEFAULT_REQUEST_TIMEOUT};
use crate::labels::{LabelQuery, DEFAULT_LABEL, DEFAULT_PER_PAGE};
use bstr::ByteSlice;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Largest page size the issue listing endpoint accepts.
const MAX_PER_PAGE: u8 = 100;

/// Configuration for an audit run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the repo list document.
    repos_path: PathBuf,
    /// Path to the file list document.
    files_path: PathBuf,
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Label identifying sync pull requests.
    label: String,
    /// Branch or tag the files are compared on.
    git_ref: String,
    /// Page size of the issue listing.
    per_page: u8,
    /// Deadline for each remote call.
    request_timeout: Duration,
    /// Custom API root (GitHub Enterprise).
    api_url: Option<String>,
}

impl RunnerConfig {
    /// Creates a new configuration with default label, ref and limits.
    pub fn new(repos_path: PathBuf, files_path: PathBuf, token: Option<String>) -> Self {
        Self {
            repos_path,
            files_path,
            token,
            label: DEFAULT_LABEL.to_string(),
            git_ref: DEFAULT_REF.to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            api_url: None,
        }
    }

    /// Sets the label identifying sync pull requests.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the ref files are read from.
    pub fn with_git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }

    /// Sets the issue listing page size.
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the per-call deadline.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sets a custom API root.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Returns the repo list path.
    pub fn repos_path(&self) -> &Path {
        &self.repos_path
    }

    /// Returns the file list path.
    pub fn files_path(&self) -> &Path {
        &self.files_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the sync pull request label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the ref files are read from.
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    /// Returns the issue listing page size.
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the per-call deadline.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the custom API root, if any.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub(crate) fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            git_ref: self.git_ref.clone(),
            timeout: self.request_timeout,
        }
    }

    pub(crate) fn label_query(&self) -> LabelQuery {
        LabelQuery {
            label: self.label.clone(),
            per_page: self.per_page,
            timeout: self.request_timeout,
        }
    }

    /// Validates settings that need no I/O, returning the parsed API root.
    pub(crate) fn validate(&self) -> Result<Option<Url>, RunnerError> {
        gix_validate::reference::name_partial(self.git_ref.as_bytes().as_bstr()).map_err(|e| {
            RunnerError::InvalidRef {
                git_ref: self.git_ref.clone(),
                message: e.to_string(),
            }
        })?;

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(RunnerError::InvalidPageSize(self.per_page));
        }

        if self.request_timeout.is_zero() {
            return Err(RunnerError::InvalidTimeout);
        }

        self.api_url
            .as_deref()
            .map(|raw| {
                let invalid = |message: String| RunnerError::InvalidApiUrl {
                    url: raw.to_string(),
                    message,
                };
                let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
                }
                Ok(url)
            })
            .transpose()
    }
}
