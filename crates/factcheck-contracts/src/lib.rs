//! # factcheck-contracts
//!
//! Shared types, configuration, and error contracts for the factcheck
//! pipeline.
//!
//! All crates in the workspace import from here. No network code lives in
//! this crate — only data definitions, config loading, and error types.

pub mod config;
pub mod error;
pub mod request;
pub mod result;
