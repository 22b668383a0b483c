//! Order endpoints.

use reqwest::Method;
use tracing::instrument;

use lotus_threads_core::{Order, OrderId, OrderIntent};

use super::{ApiClient, ApiError, Paginated};

impl ApiClient {
    /// Submit an order intent.
    ///
    /// The server re-derives every price from the current catalog, so the
    /// intent carries product IDs and quantities only. Callers must submit
    /// a given intent at most once; see [`crate::checkout::CheckoutFlow`].
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when a line exceeds stock at submission time,
    /// or any transport/server error.
    #[instrument(skip(self, intent), fields(lines = intent.items.len()))]
    pub async fn create_order(&self, intent: &OrderIntent) -> Result<Order, ApiError> {
        self.request(Method::POST, "orders", Some(serde_json::to_value(intent)?))
            .await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.request(Method::GET, &format!("orders/{id}"), None)
            .await
    }

    /// List the account's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32, size: u32) -> Result<Paginated<Order>, ApiError> {
        let size = if size == 0 { 10 } else { size };
        self.request(Method::GET, &format!("orders?page={page}&size={size}"), None)
            .await
    }
}
