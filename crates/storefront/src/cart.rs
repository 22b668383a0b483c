//! Dual-mode cart synchronizer.
//!
//! One mutation interface over two backends. Signed in, the server cart is
//! the source of truth: every mutation goes to the API, the cached copy is
//! invalidated, and the next read refetches. Signed out, lines live in the
//! guest store and product details are snapshotted at add time.
//!
//! The mode is re-checked on every call, so a sign-in or sign-out between
//! two operations is picked up immediately.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use lotus_threads_core::{CartItem, Price, Product, ProductId};

use crate::api::{ApiError, CommerceApi};
use crate::cache::{CachedResource, ResourceCache, ResourceKey};
use crate::guest::{GuestStore, GuestStoreError};
use crate::session::SessionProvider;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities below 1 are rejected outright; removal is its own
    /// operation.
    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// The requested quantity exceeds available stock. The cart is left
    /// untouched.
    #[error("Only {available} left in stock")]
    InsufficientStock { available: u32 },

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Guest(#[from] GuestStoreError),
}

/// Cart mutation and read interface, generic over the API seam.
pub struct CartSynchronizer<C> {
    api: Arc<C>,
    session: Arc<SessionProvider>,
    guest: Arc<GuestStore>,
    cache: ResourceCache,
}

impl<C> Clone for CartSynchronizer<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: Arc::clone(&self.session),
            guest: Arc::clone(&self.guest),
            cache: self.cache.clone(),
        }
    }
}

impl<C: CommerceApi> CartSynchronizer<C> {
    pub fn new(
        api: Arc<C>,
        session: Arc<SessionProvider>,
        guest: Arc<GuestStore>,
        cache: ResourceCache,
    ) -> Self {
        Self {
            api,
            session,
            guest,
            cache,
        }
    }

    /// Current cart lines.
    ///
    /// Authenticated reads are served from the cache within its staleness
    /// window; guest reads come straight from the guest store.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails.
    pub async fn items(&self) -> Result<Vec<CartItem>, CartError> {
        if !self.session.is_authenticated() {
            return Ok(self.guest.cart_items());
        }

        if let Some(CachedResource::Cart(items)) = self.cache.get(ResourceKey::Cart).await {
            return Ok(items);
        }

        let items = self.api.fetch_cart().await?;
        self.cache
            .insert(ResourceKey::Cart, CachedResource::Cart(items.clone()))
            .await;
        Ok(items)
    }

    /// Total number of units across all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails.
    pub async fn item_count(&self) -> Result<u32, CartError> {
        Ok(self.items().await?.iter().map(|item| item.quantity).sum())
    }

    /// Sum of line subtotals.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails.
    pub async fn total(&self) -> Result<Price, CartError> {
        Ok(self.items().await?.iter().map(|item| item.sub_total).sum())
    }

    /// Add `quantity` units of a product.
    ///
    /// Adding a product already in the cart merges into the existing line.
    /// Guest mode enforces the stock bound locally against a fresh product
    /// lookup; the server enforces it for account carts.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity and any add that would exceed stock; the
    /// cart is unchanged on every error path.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if self.session.is_authenticated() {
            self.api.cart_add(product_id, quantity).await?;
            self.cache.invalidate(ResourceKey::Cart).await;
            return Ok(());
        }

        let product = self.api.product(product_id).await?;

        // The stock bound depends on the existing line, so the whole
        // merge happens under one lock acquisition.
        self.guest.with_cart(|cart| {
            match cart.iter_mut().find(|line| &line.product_id == product_id) {
                Some(line) => {
                    // A merged quantity that overflows can only exceed stock.
                    let wanted = line.quantity.checked_add(quantity).ok_or(
                        CartError::InsufficientStock {
                            available: product.stock,
                        },
                    )?;
                    check_stock(&product, wanted)?;
                    *line = line.clone().with_quantity(wanted);
                }
                None => {
                    check_stock(&product, quantity)?;
                    cart.push(CartItem::from_product(&product, quantity));
                }
            }
            Ok(())
        })?
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity, a product with no line in the cart, and a
    /// quantity above stock; the cart is unchanged on every error path.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if self.session.is_authenticated() {
            self.api.cart_update(product_id, quantity).await?;
            self.cache.invalidate(ResourceKey::Cart).await;
            return Ok(());
        }

        if !self
            .guest
            .cart_items()
            .iter()
            .any(|line| &line.product_id == product_id)
        {
            return Err(CartError::NotInCart(product_id.clone()));
        }

        let product = self.api.product(product_id).await?;
        check_stock(&product, quantity)?;

        self.guest.with_cart(|cart| {
            if let Some(line) = cart.iter_mut().find(|line| &line.product_id == product_id) {
                *line = line.clone().with_quantity(quantity);
            }
        })?;
        Ok(())
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call or guest persistence fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<(), CartError> {
        if self.session.is_authenticated() {
            self.api.cart_remove(product_id).await?;
            self.cache.invalidate(ResourceKey::Cart).await;
            return Ok(());
        }

        self.guest
            .with_cart(|cart| cart.retain(|line| &line.product_id != product_id))?;
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call or guest persistence fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        if self.session.is_authenticated() {
            self.api.cart_clear().await?;
            self.cache.invalidate(ResourceKey::Cart).await;
            return Ok(());
        }

        self.guest.with_cart(Vec::clear)?;
        Ok(())
    }
}

fn check_stock(product: &Product, wanted: u32) -> Result<(), CartError> {
    if !product.in_stock || wanted > product.stock {
        return Err(CartError::InsufficientStock {
            available: product.stock,
        });
    }
    Ok(())
}
