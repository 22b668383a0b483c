//! Account wishlist endpoints.

use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use lotus_threads_core::{ProductId, WishlistItem};

use super::{ApiClient, ApiError};

/// Wishlist payload from `GET /wishlists`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishlistData {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

impl ApiClient {
    /// Fetch the account wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        let data: WishlistData = self.request(Method::GET, "wishlists", None).await?;
        Ok(data.items)
    }

    /// Add a product to the account wishlist. Idempotent server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn wishlist_add(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.request_empty(
            Method::POST,
            &format!("wishlists/add?productId={product_id}"),
            None,
        )
        .await
    }

    /// Remove a product from the account wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn wishlist_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.request_empty(
            Method::DELETE,
            &format!("wishlists/remove?productId={product_id}"),
            None,
        )
        .await
    }

    /// Empty the account wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn wishlist_clear(&self) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, "wishlists/clear", None)
            .await
    }

    /// Server-side membership check for a single product.
    ///
    /// The synchronizer answers membership from its in-memory set; this
    /// endpoint exists for cold paths that have not hydrated the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn wishlist_check(&self, product_id: &ProductId) -> Result<bool, ApiError> {
        self.request(
            Method::GET,
            &format!("wishlists/check?productId={product_id}"),
            None,
        )
        .await
    }
}
