//! Search query types

use serde::{Deserialize, Serialize};

/// Largest page the code-search service will return
pub const MAX_PER_PAGE: u32 = 100;

/// Topic tag carried by store plugin repositories
pub const DEFAULT_TOPIC: &str = "chris-app";

/// Organization owning the store plugin repositories
pub const DEFAULT_ORGANIZATION: &str = "FNNDSC";

/// Search parameters for plugin discovery
///
/// Passed explicitly into discovery; the defaults reproduce the fixed
/// topic/organization/page-size used by the bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub topic: String,
    pub organization: String,
    pub per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Immutable repository search filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    topic: String,
    organization: String,
    per_page: u32,
}

impl SearchQuery {
    /// Builds a query, clamping the page size to `1..=MAX_PER_PAGE`
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            topic: config.topic.clone(),
            organization: config.organization.clone(),
            per_page: config.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Value of the `q` search parameter, e.g. `topic:chris-app org:FNNDSC`
    ///
    /// The space is form-encoded as `+` on the wire.
    pub fn qualifier(&self) -> String {
        format!("topic:{} org:{}", self.topic, self.organization)
    }
}

impl From<&SearchConfig> for SearchQuery {
    fn from(config: &SearchConfig) -> Self {
        Self::new(config)
    }
}
