//! Dual-mode wishlist synchronizer.
//!
//! Same remote/guest split as the cart, plus an in-memory membership set so
//! per-product "is this saved?" checks are O(1) and never hit the network.
//! The set is seeded from the guest store at construction and re-derived
//! from every full fetch.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::instrument;

use lotus_threads_core::{Product, ProductId, WishlistItem};

use crate::api::CommerceApi;
use crate::cache::{CachedResource, ResourceCache, ResourceKey};
use crate::error::Result;
use crate::guest::GuestStore;
use crate::session::SessionProvider;

/// Wishlist mutation and membership interface, generic over the API seam.
pub struct WishlistSynchronizer<C> {
    api: Arc<C>,
    session: Arc<SessionProvider>,
    guest: Arc<GuestStore>,
    cache: ResourceCache,
    membership: Arc<RwLock<HashSet<ProductId>>>,
}

impl<C> Clone for WishlistSynchronizer<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: Arc::clone(&self.session),
            guest: Arc::clone(&self.guest),
            cache: self.cache.clone(),
            membership: Arc::clone(&self.membership),
        }
    }
}

impl<C: CommerceApi> WishlistSynchronizer<C> {
    pub fn new(
        api: Arc<C>,
        session: Arc<SessionProvider>,
        guest: Arc<GuestStore>,
        cache: ResourceCache,
    ) -> Self {
        let membership = guest.wishlist().into_iter().collect();
        Self {
            api,
            session,
            guest,
            cache,
            membership: Arc::new(RwLock::new(membership)),
        }
    }

    /// Whether a product is currently saved.
    ///
    /// Answered from the in-memory set. Authenticated sessions need one
    /// [`items`](Self::items) or [`refresh`](Self::refresh) call to hydrate
    /// the set before this is authoritative.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.read_membership().contains(product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_membership().len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_membership().is_empty()
    }

    /// Current wishlist entries with display snapshots.
    ///
    /// Guest entries hold product IDs only, so guest reads look each product
    /// up in the public catalog to build the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote fetch fails.
    pub async fn items(&self) -> Result<Vec<WishlistItem>> {
        if !self.session.is_authenticated() {
            let mut items = Vec::new();
            for product_id in self.guest.wishlist() {
                let product = self.api.product(&product_id).await?;
                items.push(snapshot(&product));
            }
            self.replace_membership(items.iter().map(|item| item.product_id.clone()));
            return Ok(items);
        }

        if let Some(CachedResource::Wishlist(items)) =
            self.cache.get(ResourceKey::Wishlist).await
        {
            return Ok(items);
        }

        let items = self.api.fetch_wishlist().await?;
        self.replace_membership(items.iter().map(|item| item.product_id.clone()));
        self.cache
            .insert(ResourceKey::Wishlist, CachedResource::Wishlist(items.clone()))
            .await;
        Ok(items)
    }

    /// Re-derive the membership set from the current backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails.
    pub async fn refresh(&self) -> Result<()> {
        if self.session.is_authenticated() {
            let items = self.api.fetch_wishlist().await?;
            self.replace_membership(items.iter().map(|item| item.product_id.clone()));
            self.cache
                .insert(ResourceKey::Wishlist, CachedResource::Wishlist(items))
                .await;
        } else {
            self.replace_membership(self.guest.wishlist());
        }
        Ok(())
    }

    /// Save a product. Already-saved products are left as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call or guest persistence fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> Result<()> {
        if self.session.is_authenticated() {
            self.api.wishlist_add(product_id).await?;
            self.cache.invalidate(ResourceKey::Wishlist).await;
        } else {
            self.guest.with_wishlist(|wishlist| {
                if !wishlist.contains(product_id) {
                    wishlist.push(product_id.clone());
                }
            })?;
        }
        self.write_membership().insert(product_id.clone());
        Ok(())
    }

    /// Unsave a product. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call or guest persistence fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<()> {
        if self.session.is_authenticated() {
            self.api.wishlist_remove(product_id).await?;
            self.cache.invalidate(ResourceKey::Wishlist).await;
        } else {
            self.guest
                .with_wishlist(|wishlist| wishlist.retain(|id| id != product_id))?;
        }
        self.write_membership().remove(product_id);
        Ok(())
    }

    /// Flip a product's membership, returning whether it is now saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying add or remove fails.
    pub async fn toggle(&self, product_id: &ProductId) -> Result<bool> {
        if self.contains(product_id) {
            self.remove(product_id).await?;
            Ok(false)
        } else {
            self.add(product_id).await?;
            Ok(true)
        }
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call or guest persistence fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        if self.session.is_authenticated() {
            self.api.wishlist_clear().await?;
            self.cache.invalidate(ResourceKey::Wishlist).await;
        } else {
            self.guest.with_wishlist(Vec::clear)?;
        }
        self.write_membership().clear();
        Ok(())
    }

    fn replace_membership(&self, ids: impl IntoIterator<Item = ProductId>) {
        *self.write_membership() = ids.into_iter().collect();
    }

    fn read_membership(&self) -> std::sync::RwLockReadGuard<'_, HashSet<ProductId>> {
        self.membership
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_membership(&self) -> std::sync::RwLockWriteGuard<'_, HashSet<ProductId>> {
        self.membership
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Build a display snapshot from a catalog lookup (guest mode).
fn snapshot(product: &Product) -> WishlistItem {
    WishlistItem {
        id: product.id.to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        product_slug: product.slug.clone(),
        product_images: product.images.clone(),
        product_price: product.price,
        product_discount_price: product.discount_price,
        in_stock: product.in_stock,
        created_at: Utc::now(),
    }
}
