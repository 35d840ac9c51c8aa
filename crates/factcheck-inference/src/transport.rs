//! HTTP transport and wait strategy for the inference client.
//!
//! Both are traits so the retry loop can be driven by scripted responses
//! and a recording sleeper in tests.

use std::time::Duration;

use serde_json::Value;

use factcheck_contracts::error::{FactcheckError, FactcheckResult};

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON POST with a bearer token.
pub trait InferenceTransport: Send + Sync {
    /// Any status is a successful exchange; only transport-level problems
    /// (timeout, DNS, reset, unreadable body) are errors.
    fn post_json(&self, url: &str, bearer: &str, body: &Value) -> FactcheckResult<TransportResponse>;
}

/// Blocks the caller between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// `Sleeper` backed by `std::thread::sleep`. Not interruptible.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// `InferenceTransport` over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Build a client whose every request times out after `timeout`.
    pub fn new(timeout: Duration) -> FactcheckResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FactcheckError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl InferenceTransport for ReqwestTransport {
    fn post_json(&self, url: &str, bearer: &str, body: &Value) -> FactcheckResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> FactcheckError {
    let reason = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    FactcheckError::Transport { reason }
}

#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use factcheck_contracts::{
        config::{ApiToken, InferenceConfig},
        error::{FactcheckError, FactcheckResult},
    };
    use factcheck_core::traits::TextGenerator;

    use super::{InferenceTransport, ReqwestTransport, TransportResponse};
    use crate::client::HuggingFaceClient;

    /// The blocking client must be built, used, and dropped off the async runtime.
    async fn post(url: String, bearer: &'static str, body: Value) -> FactcheckResult<TransportResponse> {
        tokio::task::spawn_blocking(move || {
            let transport = ReqwestTransport::new(Duration::from_secs(5))?;
            transport.post_json(&url, bearer, &body)
        })
        .await
        .expect("blocking task panicked")
    }

    fn request_body() -> Value {
        json!({
            "inputs": "Is the sky blue?",
            "parameters": { "max_new_tokens": 500, "temperature": 0.3, "return_full_text": false }
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_sends_bearer_and_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/org/model"))
            .and(header("authorization", "Bearer hf_test_token"))
            .and(header("content-type", "application/json"))
            .and(body_json(request_body()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "hi" }])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/models/org/model", mock_server.uri());
        let response = post(url, "hf_test_token", request_body()).await.expect("post failed");

        assert_eq!(response.status, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body, json!([{ "generated_text": "hi" }]));
    }

    /// 503 is an ordinary status at this layer; the client decides to retry.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_passes_loading_status_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Model is loading"))
            .mount(&mock_server)
            .await;

        let response = post(mock_server.uri(), "t", json!({})).await.expect("post failed");

        assert_eq!(
            response,
            TransportResponse {
                status: 503,
                body: "Model is loading".to_string()
            }
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_connection_refused_is_transport_error() {
        // Nothing listens on port 1.
        let result = post("http://127.0.0.1:1/models/x".to_string(), "t", json!({})).await;

        assert!(matches!(result, Err(FactcheckError::Transport { .. })));
    }

    /// The production client against a live server: two 503s, then a reply.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_client_retries_loading_over_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/org/model"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/org/model"))
            .and(header("authorization", "Bearer hf_test_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "done" }])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = InferenceConfig {
            api_token: ApiToken::new("hf_test_token"),
            api_base: mock_server.uri(),
            model: "org/model".to_string(),
            loading_wait_secs: 0,
            timeout_secs: 5,
            ..InferenceConfig::default()
        };

        let text = tokio::task::spawn_blocking(move || {
            let client = HuggingFaceClient::new(config)?;
            client.generate("Is the sky blue?")
        })
        .await
        .expect("blocking task panicked")
        .expect("generation failed");

        assert_eq!(text, "done");
    }
}
