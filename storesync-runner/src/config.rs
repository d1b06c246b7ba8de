//! Runner configuration
//!
//! Collects the search filter, uploader invocation and dispatch settings for
//! one run. Built from the parsed command line, which already merges in the
//! environment.

use std::path::PathBuf;
use storesync_core::domain::search::SearchConfig;

use crate::cli::Cli;

/// How to invoke the external uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    /// Program to execute
    pub program: String,

    /// Arguments placed before the repository name
    pub args: Vec<String>,

    /// Exported to the uploader as CHRIS_STORE_URL
    pub store_url: Option<String>,

    /// Exported to the uploader as CHRIS_STORE_USER
    pub store_user: Option<String>,
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Topic/organization filter and page size
    pub search: SearchConfig,

    /// Search API base URL (e.g., "https://api.github.com")
    pub api_url: String,

    /// Optional search API token
    pub github_token: Option<String>,

    pub uploader: UploaderConfig,

    /// Worker pool size; `None` or `Some(0)` uploads sequentially
    pub concurrency: Option<usize>,

    pub dry_run: bool,

    /// Turn upload failures into a non-zero exit status
    pub strict: bool,

    pub report_file: Option<PathBuf>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.topic.trim().is_empty() {
            anyhow::bail!("topic cannot be empty");
        }

        if self.search.organization.trim().is_empty() {
            anyhow::bail!("organization cannot be empty");
        }

        if !is_http_url(&self.api_url) {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.uploader.program.trim().is_empty() {
            anyhow::bail!("uploader cannot be empty");
        }

        if let Some(url) = &self.uploader.store_url {
            if !is_http_url(url) {
                anyhow::bail!("CHRIS_STORE_URL must start with http:// or https://");
            }
        }

        Ok(())
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            search: SearchConfig {
                topic: cli.topic,
                organization: cli.org,
                per_page: cli.per_page,
            },
            api_url: cli.api_url,
            github_token: cli.github_token.filter(|t| !t.is_empty()),
            uploader: UploaderConfig {
                program: cli.uploader,
                args: cli.uploader_args,
                store_url: cli.store_url,
                store_user: cli.store_user,
            },
            concurrency: cli.jobs,
            dry_run: cli.dry_run,
            strict: cli.strict,
            report_file: cli.report_file,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
