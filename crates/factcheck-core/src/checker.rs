//! The verification orchestrator.
//!
//! `FactChecker` runs one verification as a fixed linear pipeline:
//!
//!   Text → Search query → SearchProvider → Prompt → TextGenerator → ReplyParser
//!
//! Every failure along the way is folded into a `VerificationOutcome`, so
//! `verify` always returns a complete five-key result and never an error.

use tracing::{debug, info, info_span, warn};

use factcheck_contracts::{
    error::FactcheckResult,
    request::VerificationId,
    result::{VerificationOutcome, VerificationResult},
};

use crate::image;
use crate::prompt::{build_prompt, context_or_placeholder, search_query};
use crate::traits::{ReplyParser, SearchProvider, TextGenerator};

/// Drives text verification against one search provider, one model, and
/// one reply parser.
///
/// Holds no mutable state; a single instance can serve any number of
/// independent calls.
pub struct FactChecker {
    search: Box<dyn SearchProvider>,
    generator: Box<dyn TextGenerator>,
    parser: Box<dyn ReplyParser>,
}

impl FactChecker {
    /// Create a checker from its three collaborators.
    pub fn new(
        search: Box<dyn SearchProvider>,
        generator: Box<dyn TextGenerator>,
        parser: Box<dyn ReplyParser>,
    ) -> Self {
        Self {
            search,
            generator,
            parser,
        }
    }

    /// Verify `text` and return the wire-level result.
    ///
    /// Never fails: errors become one of the two fallback results.
    pub fn verify(&self, text: &str) -> VerificationResult {
        self.check(text).into_result()
    }

    /// Verify `text` and return which outcome was reached.
    ///
    /// # Pipeline
    ///
    /// 1. Derive the search query from the first 200 characters of `text`
    /// 2. Fetch search context; an empty result becomes a placeholder
    /// 3. Build the prompt from the full `text` and the context
    /// 4. Call the model
    /// 5. Hand the raw reply to the parser
    ///
    /// A search or model error short-circuits to `SystemFailure`.
    pub fn check(&self, text: &str) -> VerificationOutcome {
        let verification_id = VerificationId::new();
        let span = info_span!("verify", verification_id = %verification_id);
        let _guard = span.enter();

        info!(text_chars = text.chars().count(), "verification starting");

        let outcome = match self.run(text) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "verification error");
                VerificationOutcome::system_failure(err)
            }
        };

        match &outcome {
            VerificationOutcome::Verified(result) => info!(
                verified = ?result.verified(),
                percentage = ?result.percentage(),
                "verification complete"
            ),
            VerificationOutcome::ParseFailure { raw_excerpt } => {
                warn!(%raw_excerpt, "model reply could not be parsed")
            }
            VerificationOutcome::SystemFailure { message } => {
                warn!(%message, "verification failed")
            }
        }

        outcome
    }

    /// Image verification is not supported by the hosted backend.
    pub fn verify_image(&self, image: &[u8]) -> VerificationResult {
        image::verify_image(image)
    }

    fn run(&self, text: &str) -> FactcheckResult<VerificationOutcome> {
        let query = search_query(text);
        debug!(query = %query, "searching for context");

        let context = self.search.search(&query)?;
        let context = context_or_placeholder(&context);
        debug!(context_chars = context.chars().count(), "search context ready");

        let prompt = build_prompt(text, context);
        let reply = self.generator.generate(&prompt)?;
        debug!(reply_chars = reply.chars().count(), "model replied");

        Ok(self.parser.parse(&reply))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use factcheck_contracts::{
        error::{FactcheckError, FactcheckResult},
        result::{VerificationOutcome, VerificationResult},
    };

    use super::FactChecker;
    use crate::prompt::NO_SEARCH_RESULTS;
    use crate::traits::{ReplyParser, SearchProvider, TextGenerator};

    /// A search provider that records every query and returns a fixed answer.
    struct MockSearch {
        queries: Arc<Mutex<Vec<String>>>,
        answer: Result<String, String>,
    }

    impl MockSearch {
        fn returning(answer: &str) -> Self {
            Self {
                queries: Arc::new(Mutex::new(vec![])),
                answer: Ok(answer.to_string()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                queries: Arc::new(Mutex::new(vec![])),
                answer: Err(reason.to_string()),
            }
        }
    }

    impl SearchProvider for MockSearch {
        fn search(&self, query: &str) -> FactcheckResult<String> {
            self.queries.lock().unwrap().push(query.to_string());
            self.answer
                .clone()
                .map_err(|reason| FactcheckError::Search { reason })
        }
    }

    /// A generator that records every prompt and returns a fixed reply.
    struct MockGenerator {
        prompts: Arc<Mutex<Vec<String>>>,
        reply: Result<String, String>,
    }

    impl MockGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                prompts: Arc::new(Mutex::new(vec![])),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                prompts: Arc::new(Mutex::new(vec![])),
                reply: Err(reason.to_string()),
            }
        }
    }

    impl TextGenerator for MockGenerator {
        fn generate(&self, prompt: &str) -> FactcheckResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|reason| FactcheckError::Transport { reason })
        }
    }

    /// A parser that accepts exactly the reply "ok" and rejects anything else
    /// as unparseable.
    struct MockParser {
        replies: Arc<Mutex<Vec<String>>>,
    }

    impl MockParser {
        fn new() -> Self {
            Self {
                replies: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    impl ReplyParser for MockParser {
        fn parse(&self, reply: &str) -> VerificationOutcome {
            self.replies.lock().unwrap().push(reply.to_string());
            if reply == "ok" {
                VerificationOutcome::Verified(VerificationResult::new(
                    true,
                    90,
                    "consistent with sources",
                    vec![],
                    "fine",
                ))
            } else {
                VerificationOutcome::parse_failure(reply)
            }
        }
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    /// Long input: the search query is the first 200 characters with
    /// newlines flattened; the prompt still carries the full text.
    #[test]
    fn test_search_query_truncated_and_flattened() {
        let search = MockSearch::returning("context");
        let queries = search.queries.clone();
        let generator = MockGenerator::replying("ok");
        let prompts = generator.prompts.clone();

        let text = format!("{}\n{}", "a".repeat(150), "b".repeat(150));
        let checker = FactChecker::new(
            Box::new(search),
            Box::new(generator),
            Box::new(MockParser::new()),
        );
        checker.verify(&text);

        let expected = format!("{} {}", "a".repeat(150), "b".repeat(49));
        assert_eq!(queries.lock().unwrap().as_slice(), [expected]);
        assert!(prompts.lock().unwrap()[0].contains(&text));
    }

    /// An empty search result is replaced by the placeholder in the prompt.
    #[test]
    fn test_empty_search_uses_placeholder() {
        let generator = MockGenerator::replying("ok");
        let prompts = generator.prompts.clone();

        let checker = FactChecker::new(
            Box::new(MockSearch::returning("")),
            Box::new(generator),
            Box::new(MockParser::new()),
        );
        checker.verify("Water boils at 100C at sea level.");

        assert!(prompts.lock().unwrap()[0].contains(NO_SEARCH_RESULTS));
    }

    /// Non-empty search context is embedded and no placeholder appears.
    #[test]
    fn test_search_context_embedded() {
        let generator = MockGenerator::replying("ok");
        let prompts = generator.prompts.clone();

        let checker = FactChecker::new(
            Box::new(MockSearch::returning("Boiling point: 100C (sea level)")),
            Box::new(generator),
            Box::new(MockParser::new()),
        );
        checker.verify("Water boils at 100C at sea level.");

        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Boiling point: 100C (sea level)"));
        assert!(!prompt.contains(NO_SEARCH_RESULTS));
    }

    /// The parser's verdict is returned as-is on success.
    #[test]
    fn test_verified_outcome_passes_through() {
        let parser = MockParser::new();
        let replies = parser.replies.clone();

        let checker = FactChecker::new(
            Box::new(MockSearch::returning("ctx")),
            Box::new(MockGenerator::replying("ok")),
            Box::new(parser),
        );
        let result = checker.verify("claim");

        assert_eq!(replies.lock().unwrap().as_slice(), ["ok"]);
        assert_eq!(result.verified(), Some(true));
        assert_eq!(result.percentage(), Some(90));
        assert_eq!(result.summary(), Some("fine"));
    }

    /// An unparseable reply yields the parse fallback.
    #[test]
    fn test_parse_failure_fallback() {
        let checker = FactChecker::new(
            Box::new(MockSearch::returning("ctx")),
            Box::new(MockGenerator::replying("I cannot answer that.")),
            Box::new(MockParser::new()),
        );
        let result = checker.verify("claim");

        assert_eq!(result.verified(), Some(false));
        assert_eq!(result.percentage(), Some(50));
        assert_eq!(
            result.analysis(),
            Some("AI response could not be parsed. Raw: I cannot answer that.")
        );
    }

    /// A search failure never reaches the model and yields the system fallback.
    #[test]
    fn test_search_failure_is_system_failure() {
        let generator = MockGenerator::replying("ok");
        let prompts = generator.prompts.clone();

        let checker = FactChecker::new(
            Box::new(MockSearch::failing("dns lookup failed")),
            Box::new(generator),
            Box::new(MockParser::new()),
        );
        let outcome = checker.check("claim");

        assert!(prompts.lock().unwrap().is_empty(), "model must not be called");
        match outcome {
            VerificationOutcome::SystemFailure { message } => {
                assert!(message.contains("dns lookup failed"), "got: {message}");
            }
            other => panic!("expected SystemFailure, got {other:?}"),
        }
    }

    /// A model failure never reaches the parser and yields the system fallback.
    #[test]
    fn test_generator_failure_is_system_failure() {
        let parser = MockParser::new();
        let replies = parser.replies.clone();

        let checker = FactChecker::new(
            Box::new(MockSearch::returning("ctx")),
            Box::new(MockGenerator::failing("connection reset")),
            Box::new(parser),
        );
        let result = checker.verify("claim");

        assert!(replies.lock().unwrap().is_empty(), "parser must not be called");
        assert_eq!(result.verified(), Some(false));
        assert_eq!(result.percentage(), Some(0));
        assert_eq!(result.analysis(), Some("transport error: connection reset"));
        assert_eq!(result.errors(), Some(vec!["System error"]));
        assert_eq!(result.summary(), Some("Verification failed"));
    }

    /// Image verification ignores its collaborators entirely.
    #[test]
    fn test_verify_image_is_stub() {
        let search = MockSearch::returning("ctx");
        let queries = search.queries.clone();

        let checker = FactChecker::new(
            Box::new(search),
            Box::new(MockGenerator::replying("ok")),
            Box::new(MockParser::new()),
        );
        let result = checker.verify_image(b"not really an image");

        assert!(queries.lock().unwrap().is_empty());
        assert_eq!(result.summary(), Some("Image verification unavailable"));
        assert_eq!(result.percentage(), Some(0));
    }
}
