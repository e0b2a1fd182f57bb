//! Item basket and bulk action dispatch

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::config::HubConfig;
use crate::error::HubResult;
use crate::models::Item;
use crate::services::settings::SettingsStore;
use crate::transport::Transport;

/// Bulk actions a basket can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Loan,
    Request,
    Return,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Loan => "loan",
            ActionKind::Request => "request",
            ActionKind::Return => "return",
        };
        write!(f, "{}", label)
    }
}

/// Host-owned basket of items staged for a bulk action
#[derive(Debug, Clone, Default)]
pub struct ItemBasket {
    items: Vec<Item>,
    dedupe: bool,
}

impl ItemBasket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Basket that silently drops items whose id is already staged
    pub fn with_dedupe() -> Self {
        Self {
            items: Vec::new(),
            dedupe: true,
        }
    }

    /// Stage an item; returns false when deduplication rejected it
    pub fn add(&mut self, item: Item) -> bool {
        if self.dedupe && self.items.iter().any(|staged| staged.id == item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item at `index`; out-of-range indices are a no-op
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of dispatching one basket item
#[derive(Debug)]
pub struct ActionOutcome {
    pub item_id: String,
    pub result: HubResult<()>,
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service dispatching one action per staged basket item
#[derive(Clone)]
pub struct BasketService {
    transport: Arc<dyn Transport>,
    config: Arc<HubConfig>,
}

impl BasketService {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<HubConfig>) -> Self {
        Self { transport, config }
    }

    /// Check out every staged item for `user_id`
    pub async fn loan(
        &self,
        basket: &ItemBasket,
        user_id: &str,
        settings: &SettingsStore,
    ) -> Vec<ActionOutcome> {
        self.perform_action(ActionKind::Loan, basket, user_base(user_id), settings)
            .await
    }

    /// Place a hold on every staged item for `user_id`
    pub async fn request(
        &self,
        basket: &ItemBasket,
        user_id: &str,
        settings: &SettingsStore,
    ) -> Vec<ActionOutcome> {
        self.perform_action(ActionKind::Request, basket, user_base(user_id), settings)
            .await
    }

    /// Return every staged item
    pub async fn return_items(
        &self,
        basket: &ItemBasket,
        settings: &SettingsStore,
    ) -> Vec<ActionOutcome> {
        self.perform_action(ActionKind::Return, basket, Map::new(), settings)
            .await
    }

    /// Dispatch `kind` once per staged item and collect per-item outcomes
    ///
    /// Each payload starts from `base`, gains the item's id, then has the
    /// settings merged on top; on a key collision the settings value wins,
    /// `item_id` included. Requests run concurrently; outcomes come back in
    /// basket order, one per staged item.
    pub async fn perform_action(
        &self,
        kind: ActionKind,
        basket: &ItemBasket,
        base: Map<String, Value>,
        settings: &SettingsStore,
    ) -> Vec<ActionOutcome> {
        let url = self.endpoint_for(kind);
        tracing::debug!("Dispatching {} for {} staged item(s)", kind, basket.len());

        let mut handles: Vec<(String, JoinHandle<HubResult<()>>)> =
            Vec::with_capacity(basket.len());
        for item in basket.items() {
            let mut payload = base.clone();
            payload.insert("item_id".to_string(), Value::String(item.id.clone()));
            settings.apply(&mut payload);

            let transport = Arc::clone(&self.transport);
            let url = url.to_string();
            let body = Value::Object(payload);
            let handle = tokio::spawn(async move { transport.post_action(&url, &body).await });
            handles.push((item.id.clone(), handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (item_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(join_error.into()),
            };
            if let Err(error) = &result {
                tracing::error!("{} failed for item {}: {}", kind, item_id, error);
            }
            outcomes.push(ActionOutcome { item_id, result });
        }
        outcomes
    }

    fn endpoint_for(&self, kind: ActionKind) -> &str {
        match kind {
            ActionKind::Loan => &self.config.endpoints.loan_url,
            ActionKind::Request => &self.config.endpoints.request_url,
            ActionKind::Return => &self.config.endpoints.return_url,
        }
    }
}

fn user_base(user_id: &str) -> Map<String, Value> {
    let mut base = Map::new();
    base.insert("user_id".to_string(), Value::String(user_id.to_string()));
    base
}
