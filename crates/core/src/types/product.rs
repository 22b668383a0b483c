//! Catalog product as returned by the commerce API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A catalog product.
///
/// The remote API is the source of truth for all of these fields; the client
/// only ever reads them (guest cart lines snapshot a subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// List price.
    pub price: Price,
    /// Discounted price, if the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    /// Units available; quantity updates are bounded by this.
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub category_id: CategoryId,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_slug: String,
    pub in_stock: bool,
    #[serde(default)]
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: the discount price when present and
    /// lower than the list price, otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }
}
