//! Serper (Google search API) provider.
//!
//! One POST per query; the answer box and the top organic results are
//! rendered as plain lines for the prompt.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use factcheck_contracts::{
    config::{ApiToken, SearchConfig},
    error::{FactcheckError, FactcheckResult},
    result::excerpt,
};
use factcheck_core::traits::SearchProvider;

/// The subset of a Serper response the prompt uses.
#[derive(Debug, Default, Deserialize)]
pub struct SerperResponse {
    #[serde(default, rename = "answerBox")]
    pub answer_box: Option<AnswerBox>,
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerBox {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Render a response as prompt context, one line per result.
///
/// Organic results without a snippet are skipped. Returns the empty string
/// when nothing usable is present.
pub fn render_results(response: &SerperResponse, max_results: usize) -> String {
    let mut lines = Vec::new();

    if let Some(answer_box) = &response.answer_box {
        let answer = answer_box
            .answer
            .as_deref()
            .or(answer_box.snippet.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(answer) = answer {
            lines.push(format!("Answer: {answer}"));
        }
    }

    lines.extend(
        response
            .organic
            .iter()
            .filter(|r| !r.snippet.trim().is_empty())
            .take(max_results)
            .map(|r| format!("{}: {} ({})", r.title.trim(), r.snippet.trim(), r.link.trim())),
    );

    lines.join("\n")
}

/// `SearchProvider` backed by the Serper API.
#[derive(Debug, Clone)]
pub struct SerperSearch {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: ApiToken,
    max_results: u32,
}

impl SerperSearch {
    pub fn new(api_key: ApiToken, config: &SearchConfig) -> FactcheckResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FactcheckError::Config {
                reason: format!("failed to build search HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_results: config.max_results,
        })
    }
}

impl SearchProvider for SerperSearch {
    fn search(&self, query: &str) -> FactcheckResult<String> {
        debug!(endpoint = %self.endpoint, "querying web search");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", self.api_key.expose())
            .json(&json!({ "q": query, "num": self.max_results }))
            .send()
            .map_err(|e| FactcheckError::Search {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "web search rejected");
            return Err(FactcheckError::Search {
                reason: format!("HTTP {}: {}", status.as_u16(), excerpt(&body)),
            });
        }

        let parsed: SerperResponse = response.json().map_err(|e| FactcheckError::Search {
            reason: format!("invalid search response: {e}"),
        })?;
        let rendered = render_results(&parsed, self.max_results as usize);
        debug!(organic = parsed.organic.len(), "web search returned");
        Ok(rendered)
    }
}
