//! Dispatch domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::repository::RepositoryIdentifier;

/// One uploader invocation to be performed
///
/// `index` is the position the repository had in the discovered list and is
/// used to restore discovery order when reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchJob {
    pub id: Uuid,
    pub index: usize,
    pub repository: RepositoryIdentifier,
}

impl DispatchJob {
    pub fn new(index: usize, repository: RepositoryIdentifier) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            repository,
        }
    }

    /// Builds one job per identifier, preserving order
    pub fn from_identifiers(identifiers: Vec<RepositoryIdentifier>) -> Vec<Self> {
        identifiers
            .into_iter()
            .enumerate()
            .map(|(index, repository)| Self::new(index, repository))
            .collect()
    }
}

/// Result of a single uploader invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub job: DispatchJob,
    pub success: bool,
    /// Exit code of the uploader, absent when it never ran or was killed by a signal
    pub exit_code: Option<i32>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl UploadOutcome {
    pub fn succeeded(job: DispatchJob, started_at: DateTime<Utc>) -> Self {
        Self {
            job,
            success: true,
            exit_code: Some(0),
            error_message: None,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(
        job: DispatchJob,
        started_at: DateTime<Utc>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job,
            success: false,
            exit_code,
            error_message: Some(message.into()),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn repository(&self) -> &RepositoryIdentifier {
        &self.job.repository
    }
}

/// Aggregated outcomes of one dispatch pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchReport {
    outcomes: Vec<UploadOutcome>,
}

impl DispatchReport {
    /// Builds a report with outcomes sorted by discovery order
    pub fn new(mut outcomes: Vec<UploadOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.job.index);
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.success)
    }
}
