//! Configuration management for the circulation hub

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Backend endpoints for every request the hub issues
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    pub search_url: String,
    pub loan_url: String,
    pub request_url: String,
    pub return_url: String,
    pub extend_url: String,
    pub lose_url: String,
    pub cancel_url: String,
    pub return_missing_url: String,
}

/// Holdings search query settings
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Prepended verbatim to the user id to form the `q` parameter
    pub query_prefix: String,
}

/// Hub configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HubConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl HubConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration, when the host ships one
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific overrides (e.g. config/production.toml)
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. CIRCULATION_ENDPOINTS__LOAN_URL)
            .add_source(
                Environment::with_prefix("CIRCULATION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override the search endpoint from CIRCULATION_ITEM_SEARCH_API if set
            .set_override_option(
                "endpoints.search_url",
                env::var("CIRCULATION_ITEM_SEARCH_API").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl SearchConfig {
    /// Assemble the `q` parameter for one user's holdings
    pub fn user_query(&self, user_id: &str) -> String {
        format!("{}{}", self.query_prefix, user_id)
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            search_url: "http://localhost:5000/circulation/items/".to_string(),
            loan_url: "http://localhost:5000/hooks/receivers/circulation_loan/events/"
                .to_string(),
            request_url: "http://localhost:5000/hooks/receivers/circulation_request/events/"
                .to_string(),
            return_url: "http://localhost:5000/hooks/receivers/circulation_return/events/"
                .to_string(),
            extend_url: "http://localhost:5000/hooks/receivers/circulation_extend/events/"
                .to_string(),
            lose_url: "http://localhost:5000/hooks/receivers/circulation_lose/events/"
                .to_string(),
            cancel_url: "http://localhost:5000/hooks/receivers/circulation_cancel/events/"
                .to_string(),
            return_missing_url:
                "http://localhost:5000/hooks/receivers/circulation_return_missing/events/"
                    .to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query_prefix: "metadata._circulation.holdings.user_id:".to_string(),
        }
    }
}
