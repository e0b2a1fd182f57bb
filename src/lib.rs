//! Circulation Hub
//!
//! Client-side circulation core for library patron portals: classifies a
//! user's holdings into current loans and pending requests, and dispatches
//! bulk circulation actions for baskets of staged items.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod transport;

pub use config::HubConfig;
pub use error::{HubError, HubResult};

use transport::{HttpTransport, Transport};

/// Hub state shared with the embedding application
#[derive(Clone)]
pub struct Hub {
    pub config: Arc<HubConfig>,
    pub services: Arc<services::Services>,
}

impl Hub {
    /// Create a hub talking to the backend over HTTP
    pub fn new(config: HubConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a hub with a custom transport
    pub fn with_transport(config: HubConfig, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        let services = Arc::new(services::Services::new(transport, Arc::clone(&config)));
        Self { config, services }
    }
}
