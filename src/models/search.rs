//! Search backend response envelope

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Search engine response shape: `{hits: {hits: [Item...], total}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl SearchResults {
    pub fn items(&self) -> &[Item] {
        &self.hits.hits
    }

    /// Unwrap the nested hit list
    pub fn into_items(self) -> Vec<Item> {
        self.hits.hits
    }
}
