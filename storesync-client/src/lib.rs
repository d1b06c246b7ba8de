//! Storesync Search Client
//!
//! A small, type-safe HTTP client for the GitHub repository search API, used to
//! discover plugin repositories before uploading them to the store.
//!
//! # Example
//!
//! ```no_run
//! use storesync_client::SearchClient;
//! use storesync_core::domain::search::{SearchConfig, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> storesync_client::Result<()> {
//!     let client = SearchClient::new("https://api.github.com");
//!     let query = SearchQuery::new(&SearchConfig::default());
//!
//!     for repo in client.discover(&query).await? {
//!         println!("{}", repo);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod repositories;

pub use error::{DiscoveryError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Media type requested from the search service
pub const ACCEPT_V3_JSON: &str = "application/vnd.github.v3+json";

/// Default base URL of the search service
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// HTTP client for the repository search API
#[derive(Debug, Clone)]
pub struct SearchClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Optional API token sent as `authorization: token <t>`
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl SearchClient {
    /// Create a new search client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://api.github.com")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new search client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Authenticate requests with an API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    ///
    /// The body is read as text first so that a malformed payload surfaces as a
    /// `ParseError` instead of a transport error.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DiscoveryError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
