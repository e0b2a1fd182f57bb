//! Holding records and start-date handling
//!
//! A holding is either an active loan or a pending request attached to an
//! item in the search index. The raw wire record (`Holding`) is classified
//! into a display entry (`UserHolding`) stamped with its owning item id.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used by the circulation backend for holding dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Delivery options for a loan or request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Mail,
    Pickup,
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Delivery::Mail => "mail",
            Delivery::Pickup => "pickup",
        };
        write!(f, "{}", label)
    }
}

/// A holding record nested under an item in the search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Hold id minted by the backend; needed to cancel a request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning patron; a holding without one matches no user
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub user_id: String,
    /// Raw date string, parsed only at classification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waitlist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Delivery>,
}

/// Result of parsing a holding's start date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDate {
    Valid(NaiveDate),
    Unparseable,
}

impl StartDate {
    /// Parse a raw start date: backend `%Y-%m-%d` first, RFC 3339 as fallback
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return StartDate::Unparseable;
        };
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return StartDate::Valid(date);
        }
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => StartDate::Valid(dt.date_naive()),
            Err(_) => StartDate::Unparseable,
        }
    }

    /// True iff the date parsed and is on or before `today`.
    ///
    /// Unparseable dates compare false, so the holding falls into the
    /// request list rather than failing the whole classification pass.
    pub fn has_started(&self, today: NaiveDate) -> bool {
        match self {
            StartDate::Valid(date) => *date <= today,
            StartDate::Unparseable => false,
        }
    }
}

/// A holding classified for display, stamped with its owning item id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHolding {
    pub item_id: String,
    pub hold_id: Option<String>,
    pub user_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub delivery: Option<Delivery>,
    pub waitlist: Option<bool>,
}

impl UserHolding {
    /// Denormalize `holding` onto its owning item
    pub fn stamped(item_id: &str, holding: &Holding) -> Self {
        Self {
            item_id: item_id.to_string(),
            hold_id: holding.id.clone(),
            user_id: holding.user_id.clone(),
            start_date: holding.start_date.clone(),
            end_date: holding.end_date.clone(),
            delivery: holding.delivery,
            waitlist: holding.waitlist,
        }
    }
}
