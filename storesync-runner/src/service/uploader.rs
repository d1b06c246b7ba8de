//! Uploader service
//!
//! Runs the external uploader for one repository. The uploader owns the
//! registry protocol; this service only launches it and records how it ended.

use async_trait::async_trait;
use chrono::Utc;
use std::process::Stdio;
use storesync_core::domain::dispatch::{DispatchJob, UploadOutcome};
use tokio::process::Command;
use tracing::debug;

use crate::config::UploaderConfig;

/// Service trait for uploading one repository
///
/// Implementations never fail: every problem is folded into the returned
/// outcome so that one job cannot affect another.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, job: &DispatchJob) -> UploadOutcome;
}

/// Uploader that spawns an external command per repository
///
/// The child inherits stdout/stderr so its own output reaches the user.
/// No timeout is applied.
pub struct CommandUploader {
    config: UploaderConfig,
}

impl CommandUploader {
    pub fn new(config: UploaderConfig) -> Self {
        Self { config }
    }

    fn command(&self, job: &DispatchJob) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .arg(job.repository.as_str())
            .stdin(Stdio::null());

        if let Some(url) = &self.config.store_url {
            cmd.env("CHRIS_STORE_URL", url);
        }
        if let Some(user) = &self.config.store_user {
            cmd.env("CHRIS_STORE_USER", user);
        }

        cmd
    }
}

#[async_trait]
impl Uploader for CommandUploader {
    async fn upload(&self, job: &DispatchJob) -> UploadOutcome {
        let started_at = Utc::now();
        debug!(
            "Running {} for {} (job {})",
            self.config.program, job.repository, job.id
        );

        match self.command(job).status().await {
            Ok(status) if status.success() => UploadOutcome::succeeded(job.clone(), started_at),
            Ok(status) => UploadOutcome::failed(
                job.clone(),
                started_at,
                status.code(),
                format!("uploader exited with {}", status),
            ),
            Err(e) => UploadOutcome::failed(
                job.clone(),
                started_at,
                None,
                format!("failed to run '{}': {}", self.config.program, e),
            ),
        }
    }
}
