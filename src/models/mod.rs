//! Data models for the circulation hub

pub mod holding;
pub mod item;
pub mod search;

// Re-export commonly used types
pub use holding::{Delivery, Holding, StartDate, UserHolding};
pub use item::{CirculationInfo, Item, ItemMetadata, ItemStatus};
pub use search::{SearchHits, SearchResults};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number as an identifier.
///
/// Search backends index some ids numerically while the embedding page
/// supplies them as strings; both deserialize to the same string here.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
