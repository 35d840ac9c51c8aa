//! Hosted text-generation client.
//!
//! Retry policy, per call:
//!
//! - 503 means the model is still loading: wait `loading_wait`, try again.
//! - Any other failure (non-success status, transport error, undecodable
//!   body) is retried immediately.
//! - After `max_retries` attempts the last error is returned. If the last
//!   attempt was a 503 that error is `ModelLoading`.
//!
//! No wait follows a 503 on the final attempt, since nothing is retried
//! after it. With the defaults (3 attempts, 5 s) the worst case is two
//! waits, 10 s, rather than one wait per 503.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use factcheck_contracts::{
    config::InferenceConfig,
    error::{FactcheckError, FactcheckResult},
    result::excerpt,
};
use factcheck_core::traits::TextGenerator;

use crate::transport::{InferenceTransport, ReqwestTransport, Sleeper, ThreadSleeper};

/// Status the endpoint uses while the model is being loaded.
const MODEL_LOADING_STATUS: u16 = 503;

/// Result of one successful HTTP exchange.
enum Attempt {
    Generated(String),
    Loading,
}

/// Client for the hosted inference endpoint.
pub struct HuggingFaceClient {
    config: InferenceConfig,
    endpoint: String,
    transport: Box<dyn InferenceTransport>,
    sleeper: Box<dyn Sleeper>,
}

impl HuggingFaceClient {
    /// Build a client with a real HTTP transport and blocking waits.
    pub fn new(config: InferenceConfig) -> FactcheckResult<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(
            config,
            Box::new(transport),
            Box::new(ThreadSleeper),
        ))
    }

    /// Build a client over caller-supplied transport and wait strategy.
    pub fn with_transport(
        config: InferenceConfig,
        transport: Box<dyn InferenceTransport>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        let endpoint = config.endpoint_url();
        Self {
            config,
            endpoint,
            transport,
            sleeper,
        }
    }

    /// The URL every request is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON body for `prompt`.
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": self.config.max_new_tokens,
                "temperature": self.config.temperature,
                "return_full_text": self.config.return_full_text,
            }
        })
    }

    /// Generate text for `prompt` with at most `max_retries` attempts.
    ///
    /// With `max_retries == 0` no request is made and the result is empty.
    pub fn generate_with_retries(&self, prompt: &str, max_retries: u32) -> FactcheckResult<String> {
        let body = self.request_body(prompt);
        let mut last_error = None;

        for attempt in 1..=max_retries {
            debug!(attempt, max_retries, endpoint = %self.endpoint, "sending inference request");

            match self.attempt(&body) {
                Ok(Attempt::Generated(text)) => {
                    info!(attempt, generated_chars = text.chars().count(), "inference succeeded");
                    return Ok(text);
                }
                Ok(Attempt::Loading) => {
                    warn!(attempt, max_retries, "model loading");
                    last_error = Some(FactcheckError::ModelLoading { attempts: attempt });
                    if attempt < max_retries {
                        self.sleeper.sleep(self.config.loading_wait());
                    }
                }
                Err(err) => {
                    warn!(attempt, max_retries, error = %err, "inference attempt failed");
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Ok(String::new()),
        }
    }

    fn attempt(&self, body: &Value) -> FactcheckResult<Attempt> {
        let response = self.transport.post_json(
            &self.endpoint,
            self.config.api_token.expose(),
            body,
        )?;

        if response.status == MODEL_LOADING_STATUS {
            return Ok(Attempt::Loading);
        }
        if !(200..300).contains(&response.status) {
            return Err(FactcheckError::Http {
                status: response.status,
                body: excerpt(&response.body),
            });
        }

        let value: Value =
            serde_json::from_str(&response.body).map_err(|e| FactcheckError::InvalidResponse {
                reason: e.to_string(),
            })?;
        Ok(Attempt::Generated(generated_text(&value)))
    }
}

impl TextGenerator for HuggingFaceClient {
    fn generate(&self, prompt: &str) -> FactcheckResult<String> {
        self.generate_with_retries(prompt, self.config.max_retries)
    }
}

/// `generated_text` of the first element when `body` is a non-empty array
/// of objects; the empty string for every other shape.
pub fn generated_text(body: &Value) -> String {
    body.as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
