//! Outbound transport to the circulation backend
//!
//! The wire itself is an external collaborator: hub services speak through
//! the [`Transport`] trait and the default [`HttpTransport`] carries the
//! traffic. Failures surface as `HubError::Transport`; the hub never
//! retries or rolls back.

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HubResult;
use crate::models::SearchResults;

/// Abstraction over the HTTP layer carrying hub traffic
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with the given `q` search query
    async fn search(&self, url: &str, query: &str) -> HubResult<SearchResults>;

    /// POST a JSON action payload to `url`; any 2xx response is success
    async fn post_action(&self, url: &str, payload: &Value) -> HubResult<()>;
}
