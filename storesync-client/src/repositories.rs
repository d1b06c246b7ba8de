//! Repository search endpoint

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use storesync_core::domain::repository::RepositoryIdentifier;
use storesync_core::domain::search::SearchQuery;
use storesync_core::dto::search::RepositorySearchResponse;
use tracing::{debug, warn};

use crate::error::Result;
use crate::{ACCEPT_V3_JSON, SearchClient};

const USER_AGENT_VALUE: &str = concat!("storesync/", env!("CARGO_PKG_VERSION"));

impl SearchClient {
    /// Run a single repository search
    ///
    /// Only the first page is requested; its size is the query's `per_page`.
    ///
    /// # Arguments
    /// * `query` - Topic/organization filter and page size
    ///
    /// # Returns
    /// The decoded response body
    pub async fn search_repositories(&self, query: &SearchQuery) -> Result<RepositorySearchResponse> {
        let url = format!("{}/search/repositories", self.base_url);
        let qualifier = query.qualifier();
        debug!("Searching repositories: {} (per_page={})", qualifier, query.per_page());

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, ACCEPT_V3_JSON)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .query(&[
                ("per_page", query.per_page().to_string()),
                ("q", qualifier),
            ]);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Discover repositories matching the query
    ///
    /// Returns the full names of the returned repositories in response order,
    /// at most `per_page` of them even if the service sends more. A truncated
    /// result is logged, not treated as an error.
    pub async fn discover(&self, query: &SearchQuery) -> Result<Vec<RepositoryIdentifier>> {
        let mut response = self.search_repositories(query).await?;

        let per_page = query.per_page() as usize;
        if response.items.len() > per_page {
            warn!(
                "Search service returned {} repositories for a page of {}; keeping the first {}",
                response.items.len(),
                per_page,
                per_page
            );
            response.items.truncate(per_page);
        }

        if response.is_truncated() {
            warn!(
                "Search for '{}' matched {} repositories but only the first {} are used",
                query.qualifier(),
                response
                    .total_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "more".to_string()),
                response.items.len()
            );
        }

        Ok(response.into_identifiers())
    }
}
