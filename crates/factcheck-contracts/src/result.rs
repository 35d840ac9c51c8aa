//! Verification result and outcome types.
//!
//! A `VerificationResult` is the five-key JSON object every caller receives,
//! whether the model produced it or a fallback was synthesized. The
//! `VerificationOutcome` carries which of those happened.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The keys every result object must carry.
pub const REQUIRED_KEYS: [&str; 5] = ["verified", "percentage", "analysis", "errors", "summary"];

/// Maximum number of characters of a reply quoted back in a parse fallback.
pub const RAW_EXCERPT_CHARS: usize = 200;

/// The wire-level verification result.
///
/// Wraps the JSON object as-is. Objects coming from the model are kept
/// verbatim (including extra keys and unexpected value types); accessors
/// return `None` when a value is absent or has an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationResult(Map<String, Value>);

impl VerificationResult {
    /// Build a result from typed fields. Used for every synthesized result.
    pub fn new(
        verified: bool,
        percentage: u8,
        analysis: impl Into<String>,
        errors: Vec<String>,
        summary: impl Into<String>,
    ) -> Self {
        let mut map = Map::new();
        map.insert("verified".to_string(), json!(verified));
        map.insert("percentage".to_string(), json!(percentage));
        map.insert("analysis".to_string(), json!(analysis.into()));
        map.insert("errors".to_string(), json!(errors));
        map.insert("summary".to_string(), json!(summary.into()));
        Self(map)
    }

    /// Wrap an object returned by the model without touching its values.
    pub fn from_model(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Fallback for a reply that could not be decoded as JSON.
    ///
    /// `raw` is truncated to `RAW_EXCERPT_CHARS` characters.
    pub fn parse_fallback(raw: &str) -> Self {
        Self::new(
            false,
            50,
            format!("AI response could not be parsed. Raw: {}", excerpt(raw)),
            vec!["JSON parsing failed".to_string()],
            "Verification incomplete",
        )
    }

    /// Fallback for every other failure.
    pub fn system_fallback(message: impl Into<String>) -> Self {
        Self::new(
            false,
            0,
            message,
            vec!["System error".to_string()],
            "Verification failed",
        )
    }

    pub fn verified(&self) -> Option<bool> {
        self.0.get("verified").and_then(Value::as_bool)
    }

    pub fn percentage(&self) -> Option<i64> {
        self.0.get("percentage").and_then(Value::as_i64)
    }

    pub fn analysis(&self) -> Option<&str> {
        self.0.get("analysis").and_then(Value::as_str)
    }

    /// The `errors` entries that are strings, in order.
    pub fn errors(&self) -> Option<Vec<&str>> {
        self.0
            .get("errors")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get("summary").and_then(Value::as_str)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the result and return it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// What a single verification run produced.
///
/// Only `into_result` turns this into the wire shape; callers that care
/// about the distinction (logging, exit codes) match on the variant first.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// The model produced an object with every required key.
    Verified(VerificationResult),

    /// The cleaned reply was not valid JSON.
    ParseFailure {
        /// The cleaned reply, truncated to `RAW_EXCERPT_CHARS` characters.
        raw_excerpt: String,
    },

    /// Anything else: network, retries exhausted, search, missing keys.
    SystemFailure {
        /// Human-readable description, becomes the fallback `analysis`.
        message: String,
    },
}

impl VerificationOutcome {
    /// Build a `ParseFailure` from the full reply text.
    pub fn parse_failure(raw: &str) -> Self {
        Self::ParseFailure {
            raw_excerpt: excerpt(raw),
        }
    }

    /// Build a `SystemFailure` from any displayable error.
    pub fn system_failure(err: impl std::fmt::Display) -> Self {
        Self::SystemFailure {
            message: err.to_string(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Verified(_) => "verified",
            Self::ParseFailure { .. } => "parse_failure",
            Self::SystemFailure { .. } => "system_failure",
        }
    }

    /// Collapse into the wire-level result.
    pub fn into_result(self) -> VerificationResult {
        match self {
            Self::Verified(result) => result,
            Self::ParseFailure { raw_excerpt } => VerificationResult::parse_fallback(&raw_excerpt),
            Self::SystemFailure { message } => VerificationResult::system_fallback(message),
        }
    }
}

/// First `RAW_EXCERPT_CHARS` characters of `raw`, never splitting a code point.
pub fn excerpt(raw: &str) -> String {
    raw.chars().take(RAW_EXCERPT_CHARS).collect()
}
