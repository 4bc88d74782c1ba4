//! CLI for the repository sync audit.
//!
//! This tool checks which derivative repositories already have an open sync
//! pull request and compares the tracked files of all others against the
//! parent repository.

use clap::{Parser, ValueEnum};
use repo_sync_audit::{
    AuditReport, DriftStatus, LabelStatus, RepoSection, RunSummary, Runner, RunnerConfig,
    RunnerError,
    DEFAULT_FILES_PATH, DEFAULT_LABEL, DEFAULT_PER_PAGE, DEFAULT_REF, DEFAULT_REPOS_PATH,
    EXIT_CRITICAL, EXIT_DRIFT,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Repo Sync Audit - Report file drift between a parent repository and its derivatives.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the repo list (parent and derivatives).
    #[arg(long, default_value = DEFAULT_REPOS_PATH)]
    repos: PathBuf,

    /// Path to the file list (tracked paths per category).
    #[arg(long, default_value = DEFAULT_FILES_PATH)]
    files: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Label marking an open sync pull request.
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// Branch or tag the files are compared on.
    #[arg(long = "ref", default_value = DEFAULT_REF)]
    git_ref: String,

    /// Issues requested per label scan.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u8,

    /// Deadline for each API request, in seconds.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// GitHub API root (for GitHub Enterprise).
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Exit with a non-zero status when drift or errors are found.
    #[arg(long)]
    fail_on_drift: bool,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human readable lines.
    Text,
    /// The full report as JSON.
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();
    let format = args.format;
    let fail_on_drift = args.fail_on_drift;

    // Run the main logic
    match run(args).await {
        Ok(report) => {
            if let Err(e) = print_report(&report, format) {
                error!(error = %e, "Failed to write report");
                return ExitCode::from(EXIT_CRITICAL);
            }

            if fail_on_drift && !report.summary.in_sync() {
                ExitCode::from(EXIT_DRIFT)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr so the report on stdout stays machine readable.
/// Verbosity is controlled with `RUST_LOG` and defaults to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<AuditReport, RunnerError> {
    let mut config = RunnerConfig::new(args.repos, args.files, args.token)
        .with_label(args.label)
        .with_git_ref(args.git_ref)
        .with_per_page(args.per_page)
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs));
    if let Some(url) = args.api_url {
        config = config.with_api_url(url);
    }
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the report in the requested format.
fn print_report(report: &AuditReport, format: Format) -> Result<(), serde_json::Error> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Text => print_text_report(report),
    }
    Ok(())
}

fn print_text_report(report: &AuditReport) {
    println!(
        "\nParent: {} (ref: {}, label: {})",
        report.parent, report.git_ref, report.label
    );

    for section in &report.sections {
        print_section(section, &report.parent);
    }

    let summary = &report.summary;
    println!("\nSummary:");
    for line in summary_lines(summary) {
        println!("  {line}");
    }

    if summary.in_sync() {
        println!("\nAll compared files are in sync.");
    } else {
        println!("\nSome files are not in sync. Please review the differences.");
    }
}

/// Summary counters, one per line.
fn summary_lines(summary: &RunSummary) -> Vec<String> {
    vec![
        format!("Repositories scanned: {}", summary.repositories_scanned),
        format!("Sync PR already open: {}", summary.sync_pending),
        format!("Compared: {}", summary.compared),
        format!("Label scan errors: {}", summary.label_errors),
        format!("Files matched: {}", summary.files_matched),
        format!("Files mismatched: {}", summary.files_mismatched),
        format!("Parent read errors: {}", summary.source_errors),
        format!("Derivative read errors: {}", summary.target_errors),
        format!("Missing from derivative results: {}", summary.paths_absent),
    ]
}

fn print_section(section: &RepoSection, parent: &repo_sync_audit::RepoRef) {
    println!("\n{}", section.repo);
    match &section.label {
        LabelStatus::Found { number, title } => {
            println!("  sync PR open: #{number} \"{title}\", skipping comparison");
        }
        LabelStatus::NotFound => println!("  no open sync PR, comparing with {parent}"),
        LabelStatus::Failed { error } => println!("  label scan failed: {error}"),
    }

    for verdict in &section.verdicts {
        let outcome = match verdict.status {
            DriftStatus::Match => "identical",
            DriftStatus::Mismatch => "differs",
            DriftStatus::SourceError => "could not be read from the parent",
            DriftStatus::TargetError => "could not be read from the derivative",
            DriftStatus::PathAbsentInTarget => "missing from the derivative's results",
        };
        println!("  [{}] {} {outcome}", verdict.status.as_str(), verdict.path);
    }
}
