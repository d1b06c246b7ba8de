//! Command-line interface
//!
//! Every option can also be supplied through the environment so the binary
//! can run unchanged inside the store's development containers.

use clap::Parser;
use std::path::PathBuf;
use storesync_client::DEFAULT_API_URL;
use storesync_core::domain::search::{DEFAULT_ORGANIZATION, DEFAULT_TOPIC, MAX_PER_PAGE};

#[derive(Debug, Parser)]
#[command(name = "storesync")]
#[command(about = "Discover plugin repositories and bulk-upload them to a ChRIS store", long_about = None)]
pub struct Cli {
    /// Number of uploads to run in parallel (omit or 0 to upload one at a time)
    #[arg(value_name = "J")]
    pub jobs: Option<usize>,

    /// Store URL passed to the uploader
    #[arg(long, env = "CHRIS_STORE_URL")]
    pub store_url: Option<String>,

    /// Store user (credentials) passed to the uploader
    #[arg(long, env = "CHRIS_STORE_USER")]
    pub store_user: Option<String>,

    /// Uploader command, invoked once per repository with its full name as last argument
    #[arg(long, env = "STORESYNC_UPLOADER", default_value = "./upload_plugin.sh")]
    pub uploader: String,

    /// Extra argument placed before the repository name (repeatable)
    #[arg(long = "uploader-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub uploader_args: Vec<String>,

    /// Topic tag the plugin repositories are labelled with
    #[arg(long, env = "STORESYNC_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Organization owning the plugin repositories
    #[arg(long, env = "STORESYNC_ORG", default_value = DEFAULT_ORGANIZATION)]
    pub org: String,

    /// Search page size (capped at 100, only the first page is fetched)
    #[arg(long, default_value_t = MAX_PER_PAGE)]
    pub per_page: u32,

    /// Base URL of the repository search API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API token for the search service
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Only list the discovered repositories, do not upload
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with a non-zero status when any upload fails
    #[arg(long)]
    pub strict: bool,

    /// Write the dispatch report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report_file: Option<PathBuf>,
}
