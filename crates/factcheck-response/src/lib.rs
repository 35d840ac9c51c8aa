//! # factcheck-response
//!
//! Model reply interpretation for the factcheck pipeline.
//!
//! This crate provides [`parser::JsonReplyParser`], which implements the
//! [`factcheck_core::traits::ReplyParser`] trait. Raw replies are cleaned
//! of code fences, narrowed to their outermost `{...}` span, decoded, and
//! checked for the five required result keys.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use factcheck_response::parser::JsonReplyParser;
//! use factcheck_core::traits::ReplyParser;
//!
//! let parser = JsonReplyParser::new()?;
//! let outcome = parser.parse("```json\n{\"verified\": true, ...}\n```");
//! ```

pub mod parser;

pub use parser::JsonReplyParser;
