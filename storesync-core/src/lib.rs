//! Storesync Core
//!
//! Core types shared by the search client and the upload runner.
//!
//! This crate contains:
//! - Domain types: repository identifiers, search queries, dispatch jobs and outcomes
//! - DTOs: wire shapes of the code-search service responses

pub mod domain;
pub mod dto;
