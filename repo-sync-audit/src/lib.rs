#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod api;
pub mod config;
pub mod drift;
mod fanout;
pub mod fingerprints;
pub mod fleet;
pub mod labels;
pub mod report;
pub mod runner;

pub use api::{ApiError, ContentMetadata, ForgeApi, GitHubApi, IssueSummary};
pub use config::{
    load_file_list, load_repo_list, ConfigError, Derivative, FileList, InvalidRepoRef, RepoList,
    RepoRef, COMMON_CATEGORY, DEFAULT_FILES_PATH, DEFAULT_REPOS_PATH,
};
pub use drift::{compare, DriftStatus, DriftVerdict};
pub use fingerprints::{
    fetch_fingerprint, repo_checksums, FetchOptions, FileFingerprint, RepoFingerprintSet,
    DEFAULT_REF, DEFAULT_REQUEST_TIMEOUT,
};
pub use fleet::{scan_fleet, FleetScan};
pub use labels::{
    scan_labels, LabelCheckResult, LabelQuery, LabelStatus, DEFAULT_LABEL, DEFAULT_PER_PAGE,
};
pub use report::{AuditReport, RepoSection, RunSummary};
pub use runner::{
    AuditPlan, PlannedRepo, Runner, RunnerConfig, RunnerError, EXIT_CRITICAL, EXIT_DRIFT,
    EXIT_FILE_LIST, EXIT_MISSING_TOKEN, EXIT_REPO_LIST,
};
