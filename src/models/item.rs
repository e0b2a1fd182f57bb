//! Item (search hit) model and circulation status

use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Circulation status of an item, as indexed by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    OnShelf,
    OnLoan,
    Missing,
    /// Catch-all for statuses this client does not know; never the loan status
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::OnShelf => "on_shelf",
            ItemStatus::OnLoan => "on_loan",
            ItemStatus::Missing => "missing",
            ItemStatus::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// One item as returned by the search backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "super::lenient_id")]
    pub id: String,
    #[serde(default)]
    pub metadata: ItemMetadata,
}

/// Indexed metadata subset the hub reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "_circulation", default)]
    pub circulation: CirculationInfo,
}

/// The `_circulation` block of an item's metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CirculationInfo {
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Item {
    /// Build a bare item with the given id and status (no holdings)
    pub fn new(id: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            id: id.into(),
            metadata: ItemMetadata {
                title: None,
                circulation: CirculationInfo {
                    status,
                    holdings: Vec::new(),
                },
            },
        }
    }

    pub fn status(&self) -> ItemStatus {
        self.metadata.circulation.status
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.metadata.circulation.holdings
    }
}
