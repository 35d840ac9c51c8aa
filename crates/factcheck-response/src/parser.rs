//! Reply parser for the factcheck pipeline.
//!
//! `JsonReplyParser` implements the `ReplyParser` trait from `factcheck-core`.
//! A raw model reply goes through four steps:
//!
//! 1. **Cleanup** — every "```json" and "```" marker is removed and the
//!    result trimmed (`strip_code_fences`).
//! 2. **Extraction** — the span from the first `{` to the last `}` is cut
//!    out (`extract_json_object`).
//! 3. **Decoding** — the span is parsed with `serde_json`. A decode error is
//!    a `ParseFailure`.
//! 4. **Validation** — the value is checked against a JSON Schema that
//!    requires an object with the five result keys. A violation is a
//!    `SystemFailure` carrying `FactcheckError::MissingFields`.
//!
//! Value types are never checked: a model that answers `"percentage": "90%"`
//! gets its object back verbatim.

use serde_json::{json, Value};
use tracing::{debug, warn};

use factcheck_contracts::{
    error::{FactcheckError, FactcheckResult},
    result::{VerificationOutcome, VerificationResult, REQUIRED_KEYS},
};
use factcheck_core::traits::ReplyParser;

/// Remove Markdown code-fence markers and surrounding whitespace.
///
/// Markers are removed wherever they occur, not only at the edges.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Cut the span from the first `{` through the last `}` out of `text`.
///
/// If `text` lacks either brace it is returned unchanged. This is a
/// heuristic, not a parser, and it fails in known ways:
///
/// - Two objects (`{..} and {..}`) yield one span covering both plus the
///   text between them, which then fails to decode.
/// - A stray `}` in prose after the object, or a stray `{` before it,
///   widens the span the same way.
/// - A last `}` that comes before the first `{` (`"} then {"`) yields the
///   empty string.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        (Some(_), Some(_)) => "",
        _ => text,
    }
}

/// The `ReplyParser` used in production.
///
/// Holds the compiled validator for the required-key schema.
pub struct JsonReplyParser {
    validator: jsonschema::Validator,
}

impl JsonReplyParser {
    /// Compile the required-key schema.
    ///
    /// The schema is a constant, so this only fails if the `jsonschema`
    /// crate itself rejects it; that is reported as a configuration error.
    pub fn new() -> FactcheckResult<Self> {
        let schema = json!({
            "type": "object",
            "required": REQUIRED_KEYS,
        });
        let validator = jsonschema::validator_for(&schema).map_err(|e| FactcheckError::Config {
            reason: format!("invalid result schema: {e}"),
        })?;
        Ok(Self { validator })
    }

    /// Check `value` against the required-key schema, collecting every
    /// violation into one error.
    fn check_required(&self, value: &Value) -> FactcheckResult<()> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|error| error.to_string())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(FactcheckError::MissingFields {
                reason: violations.join("; "),
            })
        }
    }
}

impl ReplyParser for JsonReplyParser {
    fn parse(&self, reply: &str) -> VerificationOutcome {
        let cleaned = strip_code_fences(reply);
        let candidate = extract_json_object(&cleaned);

        let value: Value = match serde_json::from_str(candidate) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "model reply is not valid JSON");
                return VerificationOutcome::parse_failure(candidate);
            }
        };

        if let Err(e) = self.check_required(&value) {
            warn!(error = %e, "model reply failed required-key validation");
            return VerificationOutcome::system_failure(e);
        }

        // The schema pins the type to object, so this only guards the match.
        let Value::Object(object) = value else {
            return VerificationOutcome::system_failure(FactcheckError::MissingFields {
                reason: "reply is not a JSON object".to_string(),
            });
        };

        debug!(keys = object.len(), "model reply accepted");
        VerificationOutcome::Verified(VerificationResult::from_model(object))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
