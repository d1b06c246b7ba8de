//! Service layer
//!
//! Services wrap the two external collaborators of a run: the repository
//! search API and the uploader command.
//!
//! All services are trait-based to enable testing and dependency injection.

mod discovery;
mod uploader;

// Re-export traits
pub use discovery::DiscoveryService;
pub use uploader::Uploader;

// Re-export implementations
pub use discovery::GithubDiscoveryService;
pub use uploader::CommandUploader;
