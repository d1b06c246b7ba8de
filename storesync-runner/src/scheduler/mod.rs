//! Scheduler layer for the runner
//!
//! Owns the bounded worker pool that fans uploads out and collects their
//! outcomes.

pub mod pool;

pub use pool::WorkerPool;
