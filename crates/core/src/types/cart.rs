//! Cart and wishlist line types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{CartLineId, ProductId};
use super::price::Price;
use super::product::Product;

/// A single line in a cart.
///
/// The subtotal is never stored independently of its inputs: every
/// constructor and mutator recomputes it as quantity × effective unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    #[serde(default)]
    pub product_images: Vec<String>,
    /// List price snapshot.
    pub price: Price,
    /// Discount price snapshot, if the product was on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    pub quantity: u32,
    pub sub_total: Price,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Build a guest-side line from a product lookup.
    ///
    /// Guest storage holds no independent product cache, so the display and
    /// price fields are snapshotted from the product at add time. The line ID
    /// is generated locally; the server assigns its own for account carts.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        let effective = product.effective_price();
        Self {
            id: CartLineId::new(Uuid::new_v4().to_string()),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_slug: product.slug.clone(),
            product_images: product.images.clone(),
            price: product.price,
            discount_price: product.discount_price,
            quantity,
            sub_total: effective.times(quantity),
            updated_at: Utc::now(),
        }
    }

    /// The price a buyer pays per unit for this line.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    /// Return this line with a new quantity and a recomputed subtotal.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self.sub_total = self.effective_price().times(quantity);
        self.updated_at = Utc::now();
        self
    }
}

/// A wishlist entry: product reference plus a display/price snapshot.
///
/// Membership is set-like; there is no quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    #[serde(default)]
    pub product_images: Vec<String>,
    pub product_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_discount_price: Option<Price>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount: Option<i64>, stock: u32) -> Product {
        Product {
            id: ProductId::new("prod-1"),
            name: "Quần jean Slim Fit".to_string(),
            slug: "quan-jean-slim-fit".to_string(),
            description: String::new(),
            price: Price::from_dong(price),
            discount_price: discount.map(Price::from_dong),
            stock,
            images: vec!["img-1.jpg".to_string()],
            featured: false,
            category_id: "cat-1".into(),
            category_name: String::new(),
            category_slug: String::new(),
            in_stock: stock > 0,
            on_sale: discount.is_some(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_product_snapshots_and_computes_subtotal() {
        let item = CartItem::from_product(&product(499_000, None, 5), 2);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.sub_total, Price::from_dong(998_000));
        assert_eq!(item.product_images, vec!["img-1.jpg".to_string()]);
    }

    #[test]
    fn test_subtotal_uses_discount_price_when_lower() {
        let item = CartItem::from_product(&product(499_000, Some(399_000), 5), 3);
        assert_eq!(item.sub_total, Price::from_dong(1_197_000));
    }

    #[test]
    fn test_with_quantity_recomputes_subtotal() {
        let item = CartItem::from_product(&product(100, None, 10), 1);
        let updated = item.with_quantity(3);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.sub_total, Price::from_dong(300));
    }
}
