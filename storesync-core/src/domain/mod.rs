//! Core domain types
//!
//! These types describe a single discover-then-dispatch run. None of them
//! outlive the run; nothing here is persisted.

pub mod dispatch;
pub mod repository;
pub mod search;
