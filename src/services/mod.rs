//! Business logic services

pub mod basket;
pub mod holdings;
pub mod settings;

pub use basket::{ActionKind, ActionOutcome, BasketService, ItemBasket};
pub use holdings::{HoldingsService, HoldingsStore};
pub use settings::{SettingsPayload, SettingsStore};

use std::sync::Arc;

use crate::{config::HubConfig, transport::Transport};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub holdings: HoldingsService,
    pub basket: BasketService,
}

impl Services {
    /// Create all services sharing one transport and configuration
    pub fn new(transport: Arc<dyn Transport>, config: Arc<HubConfig>) -> Self {
        Self {
            holdings: HoldingsService::new(Arc::clone(&transport), Arc::clone(&config)),
            basket: BasketService::new(transport, config),
        }
    }
}
