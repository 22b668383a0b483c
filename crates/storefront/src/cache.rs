//! Process-wide cache for remote-owned resources.
//!
//! Client-side copies of the cart, wishlist, and address book are caches
//! with short staleness windows, never the source of truth. Every mutation
//! invalidates the corresponding key; reads within the window are served
//! locally. The cache is an explicit handle passed into each synchronizer,
//! not an ambient singleton.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

use lotus_threads_core::{Address, CartItem, WishlistItem};

/// Cart changes frequently; keep it barely warm.
const CART_TTL: Duration = Duration::from_secs(60);
/// Wishlist and addresses change rarely.
const WISHLIST_TTL: Duration = Duration::from_secs(300);
const ADDRESSES_TTL: Duration = Duration::from_secs(300);

/// Logical resource identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Cart,
    Wishlist,
    Addresses,
}

/// Cached value for a logical resource.
#[derive(Debug, Clone)]
pub enum CachedResource {
    Cart(Vec<CartItem>),
    Wishlist(Vec<WishlistItem>),
    Addresses(Vec<Address>),
}

/// Per-key staleness windows.
struct ResourceExpiry;

impl Expiry<ResourceKey, CachedResource> for ResourceExpiry {
    fn expire_after_create(
        &self,
        key: &ResourceKey,
        _value: &CachedResource,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(match key {
            ResourceKey::Cart => CART_TTL,
            ResourceKey::Wishlist => WISHLIST_TTL,
            ResourceKey::Addresses => ADDRESSES_TTL,
        })
    }
}

/// Cache of remote resources keyed by logical identity.
#[derive(Clone)]
pub struct ResourceCache {
    cache: Cache<ResourceKey, CachedResource>,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCache {
    /// Create an empty cache with per-resource TTLs.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .expire_after(ResourceExpiry)
            .build();
        Self { cache }
    }

    /// Look up a resource if it is still within its staleness window.
    pub async fn get(&self, key: ResourceKey) -> Option<CachedResource> {
        self.cache.get(&key).await
    }

    /// Store a freshly-fetched resource.
    pub async fn insert(&self, key: ResourceKey, value: CachedResource) {
        self.cache.insert(key, value).await;
    }

    /// Drop a resource after a mutation so the next read refetches.
    pub async fn invalidate(&self, key: ResourceKey) {
        self.cache.invalidate(&key).await;
    }

    /// Drop everything, e.g. on sign-in or sign-out.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
