//! reqwest-backed default transport

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HubResult;
use crate::models::SearchResults;

use super::Transport;

/// Default transport speaking JSON over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an already-configured client (timeouts, proxies)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn search(&self, url: &str, query: &str) -> HubResult<SearchResults> {
        tracing::debug!("Searching {} with q={}", url, query);
        let results = self
            .client
            .get(url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(results)
    }

    async fn post_action(&self, url: &str, payload: &Value) -> HubResult<()> {
        tracing::debug!("Dispatching action to {}", url);
        self.client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
