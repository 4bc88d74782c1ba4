//! Orchestrates a fleet audit.
//!
//! A run loads both configuration documents, scans the whole fleet for open
//! sync pull requests, and only once that scan has finished fetches
//! fingerprints for the parent and every repository still needing a check.
//! Each of those repositories is then compared against the parent.

mod config;
mod error;
mod plan;

pub use config::RunnerConfig;
pub use error::{
    RunnerError, EXIT_CRITICAL, EXIT_DRIFT, EXIT_FILE_LIST, EXIT_MISSING_TOKEN, EXIT_REPO_LIST,
};
pub use plan::{AuditPlan, PlannedRepo};

use crate::api::{ApiError, ForgeApi, GitHubApi};
use crate::config::{load_file_list, load_repo_list, ConfigError, RepoRef};
use crate::drift::compare;
use crate::fanout::fan_out;
use crate::fingerprints::{repo_checksums, FetchOptions, FileFingerprint, RepoFingerprintSet};
use crate::fleet::{scan_fleet, FleetScan};
use crate::labels::LabelStatus;
use crate::report::{AuditReport, RepoSection};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Orchestrates a full fleet audit.
pub struct Runner {
    config: RunnerConfig,
    api: Arc<dyn ForgeApi>,
}

impl Runner {
    /// Builds a runner talking to GitHub.
    ///
    /// The credential is checked before anything else.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::MissingToken`] without a non-empty token, a
    /// validation error for a bad ref, page size or API URL, or a client
    /// construction error.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let token = config
            .token()
            .filter(|token| !token.trim().is_empty())
            .ok_or(RunnerError::MissingToken)?
            .to_string();
        let api_url = config.validate()?;
        let api = GitHubApi::new(&token, api_url.as_ref())?;
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }

    /// Builds a runner on top of any [`ForgeApi`] implementation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad ref, page size or API URL.
    pub fn with_api(config: RunnerConfig, api: Arc<dyn ForgeApi>) -> Result<Self, RunnerError> {
        config.validate()?;
        Ok(Self { config, api })
    }

    /// Executes the full audit.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only for configuration failures, all of which
    /// occur before the first remote call. Remote failures are reported
    /// inside the [`AuditReport`].
    pub async fn run(&self) -> Result<AuditReport, RunnerError> {
        let repos = load_repo_list(self.config.repos_path()).map_err(RunnerError::RepoList)?;
        let files = load_file_list(self.config.files_path()).map_err(RunnerError::FileList)?;
        let plan = AuditPlan::resolve(&repos, &files).map_err(|message| {
            RunnerError::FileList(ConfigError::ValidationError {
                path: self.config.files_path().display().to_string(),
                message,
            })
        })?;

        Ok(self.run_plan(&plan).await)
    }

    /// Audits an already resolved plan.
    pub async fn run_plan(&self, plan: &AuditPlan) -> AuditReport {
        let span = info_span!(
            "audit",
            parent = %plan.parent,
            derivatives = plan.derivatives.len(),
            git_ref = %self.config.git_ref()
        );

        async {
            info!("Starting audit");

            let fleet = scan_fleet(&self.api, &plan.repos(), &self.config.label_query()).await;
            let sets = self.collect_fingerprints(plan, &fleet).await;
            let sections = build_sections(plan, &fleet, &sets);

            let report = AuditReport::new(
                plan.parent.clone(),
                self.config.git_ref().to_string(),
                self.config.label().to_string(),
                sections,
            );
            info!(
                compared = report.summary.compared,
                sync_pending = report.summary.sync_pending,
                in_sync = report.summary.in_sync(),
                "Audit complete"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Fetches the parent's and every needs-check repository's fingerprints at once.
    async fn collect_fingerprints(
        &self,
        plan: &AuditPlan,
        fleet: &FleetScan,
    ) -> BTreeMap<RepoRef, RepoFingerprintSet> {
        if fleet.needs_check.is_empty() {
            info!("No repositories need a comparison");
            return BTreeMap::new();
        }

        let mut targets = vec![(plan.parent.clone(), plan.parent_files(&fleet.needs_check))];
        targets.extend(fleet.needs_check.iter().filter_map(|repo| {
            plan.get(repo)
                .map(|planned| (planned.repo.clone(), planned.files.clone()))
        }));

        let span = info_span!("fingerprints", repos = targets.len());
        let options: FetchOptions = self.config.fetch_options();

        async {
            let slots = fan_out(targets.clone(), |(repo, files)| {
                let api = Arc::clone(&self.api);
                let options = options.clone();
                async move { repo_checksums(&api, &repo, &files, &options).await }
            })
            .await;

            slots
                .into_iter()
                .zip(targets)
                .map(|(slot, (repo, files))| {
                    let set = slot.unwrap_or_else(|| failed_set(&repo, &files));
                    (repo, set)
                })
                .collect()
        }
        .instrument(span)
        .await
    }
}

/// A set in which every path failed because its task never reported.
fn failed_set(repo: &RepoRef, files: &[String]) -> RepoFingerprintSet {
    warn!(repo = %repo, "Fingerprint task stopped before reporting");
    let fingerprints = files
        .iter()
        .map(|path| {
            FileFingerprint::failed(
                path.clone(),
                ApiError::TaskFailed {
                    message: "checksum task stopped before reporting".to_string(),
                },
            )
        })
        .collect();
    RepoFingerprintSet::new(repo.clone(), fingerprints)
}

/// Builds one report section per derivative, in plan order.
fn build_sections(
    plan: &AuditPlan,
    fleet: &FleetScan,
    sets: &BTreeMap<RepoRef, RepoFingerprintSet>,
) -> Vec<RepoSection> {
    let parent = sets.get(&plan.parent);

    plan.derivatives
        .iter()
        .map(|planned| {
            let label = fleet
                .result_for(&planned.repo)
                .map(|result| result.status.clone())
                .unwrap_or_else(|| LabelStatus::Failed {
                    error: ApiError::TaskFailed {
                        message: "repository was not scanned".to_string(),
                    },
                });

            let verdicts = match (&label, parent, sets.get(&planned.repo)) {
                (LabelStatus::NotFound, Some(parent), Some(candidate)) => {
                    compare(&parent.restricted_to(&planned.files), candidate)
                }
                _ => Vec::new(),
            };

            let section = RepoSection {
                repo: planned.repo.clone(),
                label,
                verdicts,
            };
            if section.was_compared() {
                info!(
                    repo = %section.repo,
                    files = section.verdicts.len(),
                    drift = section.drift_count(),
                    "Compared against parent"
                );
            }
            section
        })
        .collect()
}
