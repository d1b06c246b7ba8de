//! Storesync Runner
//!
//! Discovers plugin repositories through the code-search API and uploads each
//! one to a ChRIS store by invoking an external uploader.
//!
//! Architecture:
//! - Configuration: command line merged with environment variables
//! - Services: repository discovery and the uploader command
//! - Scheduler: bounded worker pool fanning uploads out
//! - Driver: the linear discover-then-dispatch pass

mod cli;
mod config;
mod driver;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use storesync_core::domain::dispatch::DispatchReport;
use storesync_core::domain::repository::RepositoryIdentifier;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;
use crate::driver::Driver;
use crate::service::{CommandUploader, GithubDiscoveryService};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storesync_runner=info,storesync_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(Cli::parse());
    config.validate().context("Invalid configuration")?;

    info!(
        "Loaded configuration: api_url={}, topic={}, org={}, concurrency={:?}",
        config.api_url, config.search.topic, config.search.organization, config.concurrency
    );
    if config.uploader.store_url.is_none() {
        warn!("CHRIS_STORE_URL is not set; the uploader will use its own default");
    }

    let discovery = Arc::new(GithubDiscoveryService::new(
        &config.api_url,
        config.github_token.as_deref(),
    ));
    let uploader = Arc::new(CommandUploader::new(config.uploader.clone()));
    let driver = Driver::new(discovery, uploader);

    if config.dry_run {
        let identifiers = driver
            .discover(&config.search)
            .await
            .context("Failed to discover repositories")?;
        print_identifiers(&identifiers);
        return Ok(ExitCode::SUCCESS);
    }

    let report = driver.run(&config.search, config.concurrency).await?;
    print_summary(&report);

    if let Some(path) = &config.report_file {
        write_report(&report, path)?;
        info!("Wrote dispatch report to {}", path.display());
    }

    if config.strict && report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints the repositories a run would upload
fn print_identifiers(identifiers: &[RepositoryIdentifier]) {
    if identifiers.is_empty() {
        println!("{}", "No repositories found.".yellow());
        return;
    }

    println!(
        "{}",
        format!("Found {} repository(ies):", identifiers.len()).bold()
    );
    for id in identifiers {
        println!("  {}", id);
    }
}

/// Prints the success/failure counts and the failed repositories
fn print_summary(report: &DispatchReport) {
    info!(
        "Dispatch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    println!();
    println!(
        "{} {} succeeded, {} failed",
        "Upload summary:".bold(),
        report.succeeded().to_string().green(),
        report.failed().to_string().red()
    );

    for outcome in report.failures() {
        println!(
            "  {} {} ({})",
            "✗".red(),
            outcome.repository(),
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}

/// Writes the report as pretty-printed JSON
fn write_report(report: &DispatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storesync_core::domain::dispatch::{DispatchJob, UploadOutcome};

    fn report() -> DispatchReport {
        let jobs = DispatchJob::from_identifiers(vec![
            RepositoryIdentifier::new("FNNDSC/a").unwrap(),
            RepositoryIdentifier::new("FNNDSC/b").unwrap(),
        ]);
        let now = Utc::now();
        DispatchReport::new(vec![
            UploadOutcome::succeeded(jobs[0].clone(), now),
            UploadOutcome::failed(jobs[1].clone(), now, Some(2), "uploader exited with exit status: 2"),
        ])
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report(&report(), &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let outcomes = written["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0]["job"]["repository"], "FNNDSC/a");
        assert_eq!(outcomes[0]["success"], true);
        assert_eq!(outcomes[1]["job"]["repository"], "FNNDSC/b");
        assert_eq!(outcomes[1]["exit_code"], 2);
    }

    #[test]
    fn test_write_report_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");

        let err = write_report(&report(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
    }
}
