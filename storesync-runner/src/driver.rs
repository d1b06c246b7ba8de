//! Discovery-and-dispatch driver
//!
//! A run is a single linear pass: discover the repositories once, then upload
//! each one. Discovery failure aborts the run before any upload starts;
//! upload failures are recorded in the report and never stop other uploads.

use anyhow::{Context, Result};
use std::sync::Arc;
use storesync_core::domain::dispatch::{DispatchJob, DispatchReport};
use storesync_core::domain::repository::RepositoryIdentifier;
use storesync_core::domain::search::{SearchConfig, SearchQuery};
use tracing::{debug, error, info};

use crate::scheduler::WorkerPool;
use crate::service::{DiscoveryService, Uploader};

pub struct Driver {
    discovery: Arc<dyn DiscoveryService>,
    uploader: Arc<dyn Uploader>,
}

impl Driver {
    pub fn new(discovery: Arc<dyn DiscoveryService>, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            discovery,
            uploader,
        }
    }

    /// Lists the repositories matching the search configuration
    pub async fn discover(&self, search: &SearchConfig) -> Result<Vec<RepositoryIdentifier>> {
        let query = SearchQuery::new(search);
        info!("Discovering repositories: {}", query.qualifier());

        let identifiers = self.discovery.discover(&query).await.map_err(|e| {
            error!("Discovery failed: {}", e);
            e
        })?;

        info!("Discovered {} repositories", identifiers.len());
        Ok(identifiers)
    }

    /// Uploads every identifier once
    ///
    /// `concurrency` of `None` or `Some(0)` uploads one at a time in list order;
    /// `Some(k)` uses a pool of `k` slots with no completion order.
    pub async fn dispatch(
        &self,
        identifiers: Vec<RepositoryIdentifier>,
        concurrency: Option<usize>,
    ) -> DispatchReport {
        let jobs = DispatchJob::from_identifiers(identifiers);
        let pool = WorkerPool::new(concurrency);
        debug!("Dispatching {} job(s), slots: {:?}", jobs.len(), pool.slots());

        pool.run(jobs, Arc::clone(&self.uploader)).await
    }

    /// Discovers then dispatches
    pub async fn run(
        &self,
        search: &SearchConfig,
        concurrency: Option<usize>,
    ) -> Result<DispatchReport> {
        let identifiers = self
            .discover(search)
            .await
            .context("Failed to discover repositories")?;

        Ok(self.dispatch(identifiers, concurrency).await)
    }
}
