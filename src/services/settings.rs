//! Shared settings merged into every dispatched action

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::Delivery;

/// Extra payload fields, in insertion order
pub type SettingsPayload = IndexMap<String, Value>;

/// Host-owned store of action settings
///
/// Settings are merged into each action payload after the per-item fields,
/// so on a key collision the settings value wins.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    payload: SettingsPayload,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one settings field, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.payload.insert(key.into(), value);
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.payload.shift_remove(key)
    }

    /// Set the delivery method field used by loan and request receivers
    pub fn set_delivery(&mut self, delivery: Delivery) {
        self.set("delivery", Value::String(delivery.to_string()));
    }

    pub fn payload(&self) -> &SettingsPayload {
        &self.payload
    }

    /// Merge the settings into an action payload, overriding colliding keys
    pub fn apply(&self, payload: &mut serde_json::Map<String, Value>) {
        for (key, value) in &self.payload {
            payload.insert(key.clone(), value.clone());
        }
    }
}
