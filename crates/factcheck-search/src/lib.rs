//! # factcheck-search
//!
//! Web-search context providers for the factcheck pipeline.
//!
//! - [`serper::SerperSearch`] queries the Serper API.
//! - [`NoSearch`] returns no context; the orchestrator then substitutes its
//!   placeholder text.
//!
//! [`provider_from_config`] picks between them based on whether an API key
//! is configured.

pub mod serper;

use tracing::info;

use factcheck_contracts::{config::SearchConfig, error::FactcheckResult};
use factcheck_core::traits::SearchProvider;

pub use serper::SerperSearch;

/// A provider that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSearch;

impl SearchProvider for NoSearch {
    fn search(&self, _query: &str) -> FactcheckResult<String> {
        Ok(String::new())
    }
}

/// `SerperSearch` when `config` carries an API key, otherwise `NoSearch`.
pub fn provider_from_config(config: &SearchConfig) -> FactcheckResult<Box<dyn SearchProvider>> {
    match &config.api_key {
        Some(key) => Ok(Box::new(SerperSearch::new(key.clone(), config)?)),
        None => {
            info!("no search API key configured, web search disabled");
            Ok(Box::new(NoSearch))
        }
    }
}

#[cfg(test)]
mod tests {
    use factcheck_contracts::config::{ApiToken, SearchConfig};

    use super::{provider_from_config, NoSearch};
    use factcheck_core::traits::SearchProvider;

    #[test]
    fn no_search_returns_empty() {
        assert_eq!(NoSearch.search("anything").unwrap(), "");
    }

    #[test]
    fn missing_key_selects_no_search() {
        let provider = provider_from_config(&SearchConfig::default()).unwrap();
        assert_eq!(provider.search("query").unwrap(), "");
    }

    #[test]
    fn configured_key_builds_serper_client() {
        let config = SearchConfig {
            api_key: Some(ApiToken::new("serper_test")),
            ..SearchConfig::default()
        };
        assert!(provider_from_config(&config).is_ok());
    }
}
