//! Data Transfer Objects
//!
//! Wire representations of the responses returned by external services.

pub mod search;
