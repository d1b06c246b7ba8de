//! Repository identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing a [`RepositoryIdentifier`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("repository identifier cannot be empty")]
    Empty,
}

/// Full name of one remote repository (e.g. `FNNDSC/pl-dircopy`)
///
/// The value is opaque to the driver: it is produced by discovery and handed
/// verbatim to the uploader. Only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryIdentifier(String);

impl RepositoryIdentifier {
    pub fn new(full_name: impl Into<String>) -> Result<Self, IdentifierError> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(full_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owner part of an `owner/name` identifier
    pub fn owner(&self) -> Option<&str> {
        self.0.split_once('/').map(|(owner, _)| owner)
    }

    /// Name part of an `owner/name` identifier, or the whole value if unqualified
    pub fn name(&self) -> &str {
        self.0
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl TryFrom<String> for RepositoryIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepositoryIdentifier> for String {
    fn from(id: RepositoryIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for RepositoryIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
