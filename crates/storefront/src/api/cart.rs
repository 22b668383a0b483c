//! Account cart endpoints.
//!
//! These operate on the authenticated account's server-side cart. Guest
//! carts never touch these endpoints; see [`crate::guest`].

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use lotus_threads_core::{CartItem, Price, ProductId};

use super::{ApiClient, ApiError};

/// Cart payload from `GET /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartData {
    #[serde(default)]
    items: Vec<CartItem>,
    // Informational; totals are recomputed locally from the lines.
    #[serde(default)]
    #[allow(dead_code)]
    total_price: Price,
}

impl ApiClient {
    /// Fetch the account cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let data: CartData = self.request(Method::GET, "cart", None).await?;
        Ok(data.items)
    }

    /// Add a product to the account cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the add (e.g. insufficient
    /// stock) or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn cart_add(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        self.request_empty(
            Method::POST,
            "cart/add",
            Some(json!({ "productId": product_id, "quantity": quantity })),
        )
        .await
    }

    /// Set a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the update or the request
    /// fails; the server cart is untouched on rejection.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn cart_update(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        self.request_empty(
            Method::PUT,
            "cart/update",
            Some(json!({ "productId": product_id, "quantity": quantity })),
        )
        .await
    }

    /// Remove a product's line from the account cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn cart_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.request_empty(
            Method::DELETE,
            &format!("cart/remove?productId={product_id}"),
            None,
        )
        .await
    }

    /// Empty the account cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn cart_clear(&self) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, "cart/clear", None).await
    }
}
