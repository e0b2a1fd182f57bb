//! Holdings classification and per-item circulation actions

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::config::HubConfig;
use crate::error::HubResult;
use crate::models::{Item, ItemStatus, StartDate, UserHolding};
use crate::transport::Transport;

/// Host-owned store of one user's classified holdings
#[derive(Debug, Clone, Default)]
pub struct HoldingsStore {
    loans: Vec<UserHolding>,
    requests: Vec<UserHolding>,
}

impl HoldingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a page of items into the user's loans and pending requests
    ///
    /// Only holdings belonging to `user_id` are considered. A holding is a
    /// current loan when its start date is on or before `today` and the item
    /// is on loan; everything else is a pending request. Results are appended
    /// so repeated calls accumulate; `reset` clears the store.
    pub fn classify(&mut self, items: &[Item], user_id: &str, today: NaiveDate) {
        for item in items {
            for holding in item.holdings() {
                if holding.user_id != user_id {
                    continue;
                }
                let stamped = UserHolding::stamped(&item.id, holding);
                let started = StartDate::parse(holding.start_date.as_deref()).has_started(today);
                if started && item.status() == ItemStatus::OnLoan {
                    self.loans.push(stamped);
                } else {
                    self.requests.push(stamped);
                }
            }
        }
    }

    /// Drop all classified holdings
    pub fn reset(&mut self) {
        self.loans.clear();
        self.requests.clear();
    }

    /// Holdings the user currently has at home
    pub fn loans(&self) -> &[UserHolding] {
        &self.loans
    }

    /// Holdings the user is still waiting for
    pub fn requests(&self) -> &[UserHolding] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.loans.len() + self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty() && self.requests.is_empty()
    }
}

/// Service for fetching a user's holdings and acting on single items
#[derive(Clone)]
pub struct HoldingsService {
    transport: Arc<dyn Transport>,
    config: Arc<HubConfig>,
}

impl HoldingsService {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<HubConfig>) -> Self {
        Self { transport, config }
    }

    /// Fetch every item carrying a holding for this user
    pub async fn fetch_items(&self, user_id: &str) -> HubResult<Vec<Item>> {
        let query = self.config.search.user_query(user_id);
        tracing::debug!("Searching holdings for user {}", user_id);
        let results = self
            .transport
            .search(&self.config.endpoints.search_url, &query)
            .await?;
        Ok(results.into_items())
    }

    /// Fetch the user's items and reclassify `store` from scratch
    pub async fn refresh(&self, store: &mut HoldingsStore, user_id: &str) -> HubResult<()> {
        let items = self.fetch_items(user_id).await?;
        store.reset();
        store.classify(&items, user_id, Utc::now().date_naive());
        Ok(())
    }

    /// Ask for a loan extension, optionally proposing a new end date
    pub async fn extend(&self, item_id: &str, requested_end_date: Option<&str>) -> HubResult<()> {
        let mut payload = item_payload(item_id);
        // A blank date means "no proposal": the key is left out entirely
        if let Some(end_date) = requested_end_date.filter(|date| !date.is_empty()) {
            payload.insert(
                "requested_end_date".to_string(),
                Value::String(end_date.to_string()),
            );
        }
        self.dispatch(&self.config.endpoints.extend_url, "extend", item_id, payload)
            .await
    }

    /// Report a borrowed item as lost
    pub async fn lose(&self, item_id: &str) -> HubResult<()> {
        self.dispatch(
            &self.config.endpoints.lose_url,
            "lose",
            item_id,
            item_payload(item_id),
        )
        .await
    }

    /// Cancel a pending request
    pub async fn cancel(&self, item_id: &str, hold_id: &str) -> HubResult<()> {
        let mut payload = item_payload(item_id);
        payload.insert("hold_id".to_string(), Value::String(hold_id.to_string()));
        self.dispatch(&self.config.endpoints.cancel_url, "cancel", item_id, payload)
            .await
    }

    /// Report a previously lost item as found and returned
    pub async fn return_missing(&self, item_id: &str) -> HubResult<()> {
        self.dispatch(
            &self.config.endpoints.return_missing_url,
            "return_missing",
            item_id,
            item_payload(item_id),
        )
        .await
    }

    async fn dispatch(
        &self,
        url: &str,
        action: &str,
        item_id: &str,
        payload: Map<String, Value>,
    ) -> HubResult<()> {
        tracing::debug!("Dispatching {} for item {}", action, item_id);
        self.transport.post_action(url, &Value::Object(payload)).await
    }
}

fn item_payload(item_id: &str) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("item_id".to_string(), Value::String(item_id.to_string()));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Holding;
    use crate::transport::MockTransport;
    use serde_json::json;

    fn holding_for(user_id: &str, start_date: Option<&str>) -> Holding {
        Holding {
            user_id: user_id.to_string(),
            start_date: start_date.map(str::to_string),
            ..Holding::default()
        }
    }

    fn item_with(id: &str, status: ItemStatus, holdings: Vec<Holding>) -> Item {
        let mut item = Item::new(id, status);
        item.metadata.circulation.holdings = holdings;
        item
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, 15).unwrap()
    }

    #[test]
    fn test_started_loan_holdings_are_loans() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![holding_for("U1", Some("2021-06-01"))],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert_eq!(store.loans().len(), 1);
        assert!(store.requests().is_empty());
        assert_eq!(store.loans()[0].item_id, "I1");
        assert_eq!(store.loans()[0].user_id, "U1");
    }

    #[test]
    fn test_holdings_on_unavailable_items_are_requests() {
        // Started, but the item itself is not out on loan
        let items = vec![
            item_with(
                "I1",
                ItemStatus::OnShelf,
                vec![holding_for("U1", Some("2021-06-01"))],
            ),
            item_with(
                "I2",
                ItemStatus::Missing,
                vec![holding_for("U1", Some("2021-06-01"))],
            ),
        ];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert!(store.loans().is_empty());
        assert_eq!(store.requests().len(), 2);
    }

    #[test]
    fn test_future_start_date_is_a_request() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![holding_for("U1", Some("2021-07-01"))],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert!(store.loans().is_empty());
        assert_eq!(store.requests().len(), 1);
    }

    #[test]
    fn test_start_date_today_counts_as_started() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![holding_for("U1", Some("2021-06-15"))],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert_eq!(store.loans().len(), 1);
    }

    #[test]
    fn test_other_users_holdings_are_ignored() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![
                holding_for("U2", Some("2021-06-01")),
                holding_for("U1", Some("2021-06-01")),
                holding_for("U3", None),
            ],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert_eq!(store.len(), 1);
        assert_eq!(store.loans()[0].user_id, "U1");
    }

    #[test]
    fn test_unreadable_start_date_is_a_request() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![
                holding_for("U1", Some("next tuesday")),
                holding_for("U1", None),
            ],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());

        assert!(store.loans().is_empty());
        assert_eq!(store.requests().len(), 2);
    }

    #[test]
    fn test_unknown_status_holdings_are_requests() {
        let item: Item = serde_json::from_value(json!({
            "id": "I1",
            "metadata": {
                "_circulation": {
                    "status": "pending",
                    "holdings": [{"user_id": "U1", "start_date": "2021-06-01"}]
                }
            }
        }))
        .unwrap();
        assert_eq!(item.status(), ItemStatus::Unknown);

        let mut store = HoldingsStore::new();
        store.classify(&[item], "U1", today());

        assert!(store.loans().is_empty());
        assert_eq!(store.requests().len(), 1);
        assert_eq!(store.requests()[0].item_id, "I1");
    }

    #[test]
    fn test_numeric_wire_user_id_matches_the_filter() {
        // Search backends may index user ids numerically
        let item: Item = serde_json::from_value(json!({
            "id": "I2",
            "metadata": {
                "_circulation": {
                    "status": "on_loan",
                    "holdings": [{"user_id": 7, "start_date": "2021-06-01"}]
                }
            }
        }))
        .unwrap();

        let mut store = HoldingsStore::new();
        store.classify(&[item], "7", today());

        assert_eq!(store.loans().len(), 1);
        assert_eq!(store.loans()[0].user_id, "7");
        assert_eq!(store.loans()[0].item_id, "I2");
    }

    #[test]
    fn test_classify_accumulates_until_reset() {
        let items = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![holding_for("U1", Some("2021-06-01"))],
        )];

        let mut store = HoldingsStore::new();
        store.classify(&items, "U1", today());
        store.classify(&items, "U1", today());
        assert_eq!(store.loans().len(), 2);

        store.reset();
        assert!(store.is_empty());
    }

    fn service_with(transport: MockTransport) -> HoldingsService {
        HoldingsService::new(Arc::new(transport), Arc::new(HubConfig::default()))
    }

    #[tokio::test]
    async fn test_fetch_items_builds_prefixed_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_search()
            .withf(|url, query| {
                url == "http://localhost:5000/circulation/items/"
                    && query == "metadata._circulation.holdings.user_id:U7"
            })
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_value(json!({
                    "hits": {
                        "hits": [{"id": "I1", "metadata": {"_circulation": {"status": "on_loan"}}}],
                        "total": 1
                    }
                }))
                .unwrap())
            });

        let items = service_with(transport).fetch_items("U7").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "I1");
    }

    #[tokio::test]
    async fn test_refresh_replaces_previous_classification() {
        let mut transport = MockTransport::new();
        transport.expect_search().times(1).returning(|_, _| {
            Ok(serde_json::from_value(json!({
                "hits": {
                    "hits": [{
                        "id": "I9",
                        "metadata": {"_circulation": {
                            "status": "on_loan",
                            "holdings": [{"user_id": "U1", "start_date": "2020-01-01"}]
                        }}
                    }],
                    "total": 1
                }
            }))
            .unwrap())
        });

        let mut store = HoldingsStore::new();
        let stale = vec![item_with(
            "I1",
            ItemStatus::OnLoan,
            vec![holding_for("U1", Some("2021-06-01"))],
        )];
        store.classify(&stale, "U1", today());
        assert_eq!(store.len(), 1);

        service_with(transport).refresh(&mut store, "U1").await.unwrap();

        assert_eq!(store.loans().len(), 1);
        assert_eq!(store.loans()[0].item_id, "I9");
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_extend_sends_requested_end_date() {
        let mut transport = MockTransport::new();
        transport
            .expect_post_action()
            .withf(|url, payload| {
                url.ends_with("/circulation_extend/events/")
                    && payload["item_id"] == json!("I1")
                    && payload["requested_end_date"] == json!("2021-09-30")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        service_with(transport)
            .extend("I1", Some("2021-09-30"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_extend_omits_blank_end_date() {
        let mut transport = MockTransport::new();
        transport
            .expect_post_action()
            .withf(|_, payload| {
                payload["item_id"] == json!("I1") && payload.get("requested_end_date").is_none()
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let service = service_with(transport);
        service.extend("I1", None).await.unwrap();
        service.extend("I1", Some("")).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_sends_item_and_hold_ids() {
        let mut transport = MockTransport::new();
        transport
            .expect_post_action()
            .withf(|url, payload| {
                url.ends_with("/circulation_cancel/events/")
                    && payload["item_id"] == json!("I1")
                    && payload["hold_id"] == json!("H4")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        service_with(transport).cancel("I1", "H4").await.unwrap();
    }

    #[tokio::test]
    async fn test_lose_and_return_missing_target_their_receivers() {
        let mut transport = MockTransport::new();
        transport
            .expect_post_action()
            .withf(|url, payload| {
                url.ends_with("/circulation_lose/events/") && payload["item_id"] == json!("I1")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        transport
            .expect_post_action()
            .withf(|url, payload| {
                url.ends_with("/circulation_return_missing/events/")
                    && payload["item_id"] == json!("I1")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service_with(transport);
        service.lose("I1").await.unwrap();
        service.return_missing("I1").await.unwrap();
    }
}
