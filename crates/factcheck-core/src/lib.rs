//! # factcheck-core
//!
//! The verification orchestrator for the factcheck pipeline.
//!
//! This crate provides:
//! - The three pipeline traits (`SearchProvider`, `TextGenerator`, `ReplyParser`)
//! - Search query and prompt construction
//! - The `FactChecker` that wires the traits together in order
//! - The image verification stub
//!
//! ## Usage
//!
//! ```rust,ignore
//! use factcheck_core::{FactChecker, traits::{SearchProvider, TextGenerator, ReplyParser}};
//! ```

pub mod checker;
pub mod image;
pub mod prompt;
pub mod traits;

pub use checker::FactChecker;
