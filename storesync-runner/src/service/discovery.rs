//! Discovery service
//!
//! Lists the repositories to upload by querying the search API once.

use async_trait::async_trait;
use storesync_client::{DiscoveryError, SearchClient};
use storesync_core::domain::repository::RepositoryIdentifier;
use storesync_core::domain::search::SearchQuery;

/// Service trait for repository discovery
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Returns the identifiers matching `query`, in service order
    ///
    /// Any failure is fatal for the run; there is no partial result.
    async fn discover(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RepositoryIdentifier>, DiscoveryError>;
}

/// Discovery backed by the GitHub search API
pub struct GithubDiscoveryService {
    client: SearchClient,
}

impl GithubDiscoveryService {
    /// Creates a discovery service for the given API base URL
    pub fn new(api_url: &str, token: Option<&str>) -> Self {
        let client = SearchClient::new(api_url);
        let client = match token {
            Some(token) => client.with_token(token),
            None => client,
        };
        Self { client }
    }
}

#[async_trait]
impl DiscoveryService for GithubDiscoveryService {
    async fn discover(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RepositoryIdentifier>, DiscoveryError> {
        self.client.discover(query).await
    }
}
