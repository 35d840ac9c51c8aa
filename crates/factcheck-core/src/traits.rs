//! Trait seams of the verification pipeline.
//!
//! - `SearchProvider` — untrusted web context (may be a live search API)
//! - `TextGenerator`  — the hosted model (untrusted output)
//! - `ReplyParser`    — trusted interpreter of the model's raw reply
//!
//! `FactChecker` wires them together in a fixed order. Each seam is a trait
//! so tests can substitute scripted implementations without network access.

use factcheck_contracts::{error::FactcheckResult, result::VerificationOutcome};

/// Produces grounding context for a search query.
pub trait SearchProvider: Send + Sync {
    /// Return rendered search snippets for `query`.
    ///
    /// An empty string means "no results" and is not an error; the
    /// orchestrator substitutes a placeholder. Errors are treated as a
    /// system failure of the whole verification.
    fn search(&self, query: &str) -> FactcheckResult<String>;
}

/// A language model that turns a prompt into raw text.
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// Implementations own their retry policy. The returned text is the
    /// model's raw reply, not yet cleaned or parsed.
    fn generate(&self, prompt: &str) -> FactcheckResult<String>;
}

/// Interprets a raw model reply.
///
/// Infallible by construction: every reply maps to exactly one
/// `VerificationOutcome` variant.
pub trait ReplyParser: Send + Sync {
    fn parse(&self, reply: &str) -> VerificationOutcome;
}
