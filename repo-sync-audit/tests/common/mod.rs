//! Shared helpers for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use repo_sync_audit::{ApiError, ContentMetadata, ForgeApi, IssueSummary, RepoRef};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Root of the checked-in fixture documents.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Writes a document into `dir` and returns its path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub fn repo(full_name: &str) -> RepoRef {
    RepoRef::parse(full_name, None).unwrap()
}

/// In-memory hosting service with canned answers.
///
/// Unknown files answer 404; repositories without a configured listing
/// answer with an empty one.
#[derive(Default)]
pub struct FakeForge {
    files: HashMap<(RepoRef, String), Result<String, ApiError>>,
    listings: HashMap<RepoRef, Result<Vec<IssueSummary>, ApiError>>,
    listing_calls: AtomicUsize,
    content_calls: Mutex<Vec<(RepoRef, String, String)>>,
}

impl FakeForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, repo_name: &str, path: &str, sha: &str) -> Self {
        self.files
            .insert((repo(repo_name), path.to_string()), Ok(sha.to_string()));
        self
    }

    pub fn with_file_error(mut self, repo_name: &str, path: &str, error: ApiError) -> Self {
        self.files.insert((repo(repo_name), path.to_string()), Err(error));
        self
    }

    pub fn with_sync_pr(mut self, repo_name: &str, number: u64, title: &str) -> Self {
        self.listings.insert(
            repo(repo_name),
            Ok(vec![IssueSummary {
                number,
                title: title.to_string(),
                is_pull_request: true,
            }]),
        );
        self
    }

    pub fn with_listing_error(mut self, repo_name: &str, error: ApiError) -> Self {
        self.listings.insert(repo(repo_name), Err(error));
        self
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> Vec<(RepoRef, String, String)> {
        self.content_calls.lock().unwrap().clone()
    }

    pub fn content_calls_for(&self, repo_name: &str) -> usize {
        let target = repo(repo_name);
        self.content_calls()
            .iter()
            .filter(|(repo, _, _)| *repo == target)
            .count()
    }
}

#[async_trait]
impl ForgeApi for FakeForge {
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        _label: &str,
        _per_page: u8,
    ) -> Result<Vec<IssueSummary>, ApiError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        self.listings.get(repo).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn content_metadata(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<ContentMetadata, ApiError> {
        self.content_calls
            .lock()
            .unwrap()
            .push((repo.clone(), path.to_string(), git_ref.to_string()));

        match self.files.get(&(repo.clone(), path.to_string())) {
            Some(Ok(sha)) => Ok(ContentMetadata {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.to_string(),
                sha: sha.clone(),
            }),
            Some(Err(error)) => Err(error.clone()),
            None => Err(ApiError::status(404, "Not Found")),
        }
    }
}
