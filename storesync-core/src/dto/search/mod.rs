//! Repository search DTOs
//!
//! Subset of the `GET /search/repositories` response that discovery needs.
//! Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::repository::RepositoryIdentifier;

/// Response body of a repository search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySearchResponse {
    /// Number of repositories matching the query across all pages
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Set by the service when the search timed out before completing
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<RepositoryItem>,
}

/// One repository in a search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryItem {
    pub full_name: RepositoryIdentifier,
}

impl RepositorySearchResponse {
    /// Identifiers of all returned repositories, in response order
    pub fn into_identifiers(self) -> Vec<RepositoryIdentifier> {
        self.items.into_iter().map(|item| item.full_name).collect()
    }

    /// Whether more repositories matched than this page returned
    pub fn is_truncated(&self) -> bool {
        self.incomplete_results
            || self
                .total_count
                .is_some_and(|total| total > self.items.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_response() {
        let body = r#"{"items":[{"full_name":"FNNDSC/a"},{"full_name":"FNNDSC/b"}]}"#;
        let response: RepositorySearchResponse = serde_json::from_str(body).unwrap();
        assert!(!response.is_truncated());

        let ids = response.into_identifiers();
        let names: Vec<_> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["FNNDSC/a", "FNNDSC/b"]);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let body = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{"id": 7, "name": "pl-a", "full_name": "FNNDSC/pl-a", "private": false}]
        }"#;
        let response: RepositorySearchResponse = serde_json::from_str(body).unwrap();
        assert!(!response.is_truncated());
        assert_eq!(response.items[0].full_name.as_str(), "FNNDSC/pl-a");
    }

    #[test]
    fn test_truncation_detected() {
        let body = r#"{"total_count": 150, "items": [{"full_name": "FNNDSC/a"}]}"#;
        let response: RepositorySearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_truncated());

        let body = r#"{"incomplete_results": true, "items": []}"#;
        let response: RepositorySearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_truncated());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(serde_json::from_str::<RepositorySearchResponse>(r#"{"repos":[]}"#).is_err());
        assert!(
            serde_json::from_str::<RepositorySearchResponse>(r#"{"items":[{"name":"a"}]}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<RepositorySearchResponse>(r#"{"items":[{"full_name":""}]}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<RepositorySearchResponse>("not json").is_err());
    }
}
