//! Process configuration.
//!
//! `FactcheckConfig` is loaded once at startup and handed by value (or
//! reference) to the components that need it. Nothing reads the
//! environment after that point.
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! environment overrides.
//!
//! ```toml
//! [inference]
//! enabled = true
//! model = "mistralai/Mistral-7B-Instruct-v0.2"
//! max_retries = 3
//!
//! [search]
//! max_results = 5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{FactcheckError, FactcheckResult};

/// Environment variable holding the inference bearer token.
pub const ENV_INFERENCE_TOKEN: &str = "HUGGINGFACE_API_KEY";
/// Environment variable enabling the hosted inference backend.
pub const ENV_INFERENCE_ENABLED: &str = "USE_HUGGINGFACE";
/// Environment variable holding the web-search API key.
pub const ENV_SEARCH_KEY: &str = "SERPER_API_KEY";

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://google.serper.dev/search";

/// A secret credential. `Debug` never prints the value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for building request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiToken(<empty>)")
        } else {
            f.write_str("ApiToken(***)")
        }
    }
}

/// Settings for the hosted inference endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    /// Feature flag: whether the hosted backend may be used at all.
    pub enabled: bool,
    /// Bearer token sent in the `Authorization` header.
    pub api_token: ApiToken,
    /// Base URL; the endpoint is `{api_base}/models/{model}`.
    pub api_base: String,
    /// Hosted model identifier.
    pub model: String,
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub return_full_text: bool,
    /// Per-request network timeout.
    pub timeout_secs: u64,
    /// Total attempts per generation, 503s included.
    pub max_retries: u32,
    /// Wait after a 503 before the next attempt.
    pub loading_wait_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_token: ApiToken::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_new_tokens: 500,
            temperature: 0.3,
            return_full_text: false,
            timeout_secs: 30,
            max_retries: 3,
            loading_wait_secs: 5,
        }
    }
}

impl InferenceConfig {
    /// Full URL of the generation endpoint.
    pub fn endpoint_url(&self) -> String {
        format!("{}/models/{}", self.api_base.trim_end_matches('/'), self.model)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn loading_wait(&self) -> Duration {
        Duration::from_secs(self.loading_wait_secs)
    }
}

/// Settings for the web-search collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// API key; `None` disables web search entirely.
    pub api_key: Option<ApiToken>,
    pub endpoint: String,
    /// Number of organic results requested and rendered.
    pub max_results: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            max_results: 5,
            timeout_secs: 10,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration, immutable after `load`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactcheckConfig {
    pub inference: InferenceConfig,
    pub search: SearchConfig,
}

impl FactcheckConfig {
    /// Parse `s` as TOML. Missing tables and keys take their defaults.
    ///
    /// Returns `FactcheckError::Config` if the TOML is malformed, has
    /// unknown keys, or fails validation.
    pub fn from_toml_str(s: &str) -> FactcheckResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| FactcheckError::Config {
            reason: format!("failed to parse config TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> FactcheckResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FactcheckError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> FactcheckResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with variables resolved through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> FactcheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// The startup path: optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> FactcheckResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overwrite fields for every variable `lookup` resolves.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_INFERENCE_TOKEN) {
            self.inference.api_token = ApiToken::new(token);
        }
        if let Some(flag) = lookup(ENV_INFERENCE_ENABLED) {
            self.inference.enabled = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(key) = lookup(ENV_SEARCH_KEY).filter(|v| !v.trim().is_empty()) {
            self.search.api_key = Some(ApiToken::new(key));
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> FactcheckResult<()> {
        let inference = &self.inference;
        if inference.model.trim().is_empty() {
            return Err(config_error("inference.model must not be empty"));
        }
        if inference.max_retries == 0 {
            return Err(config_error("inference.max_retries must be at least 1"));
        }
        if inference.timeout_secs == 0 {
            return Err(config_error("inference.timeout_secs must be at least 1"));
        }
        if inference.temperature.is_nan() || inference.temperature < 0.0 {
            return Err(config_error("inference.temperature must be non-negative"));
        }
        if self.search.timeout_secs == 0 {
            return Err(config_error("search.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(reason: &str) -> FactcheckError {
    FactcheckError::Config {
        reason: reason.to_string(),
    }
}
