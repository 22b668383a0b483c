//! Lotus Threads Storefront - client library for the remote commerce API.
//!
//! This crate is the engine behind the storefront UI: it owns every network
//! conversation with the commerce backend and all client-side purchase
//! state. The UI layer (the `lotus` CLI in this workspace) stays purely
//! presentational.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - HTTP gateway: bearer injection, the canonical
//!   `{success, message, data}` envelope, and the 401 refresh protocol
//! - [`session::SessionProvider`] - access/refresh token lifecycle
//! - [`guest::GuestStore`] - JSON-file persistence for unauthenticated
//!   cart/wishlist state
//! - [`cart::CartSynchronizer`] / [`wishlist::WishlistSynchronizer`] -
//!   dual-mode (remote vs. guest) mutation interfaces
//! - [`checkout::CheckoutFlow`] - the address/payment/confirmation state
//!   machine that builds and submits an order intent
//! - [`payment::PaymentFlow`] - post-submission payment status polling
//!
//! # Example
//!
//! ```rust,ignore
//! use lotus_threads_storefront::{ClientConfig, Storefront};
//!
//! let config = ClientConfig::from_env()?;
//! let store = Storefront::new(&config)?;
//!
//! store.cart().add_item(&product_id, 1).await?;
//! let items = store.cart().items().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod guest;
pub mod notify;
pub mod payment;
pub mod session;
pub mod wishlist;

pub use config::ClientConfig;
pub use error::{Result, StorefrontError};

use std::sync::Arc;

use api::ApiClient;
use cache::ResourceCache;
use cart::CartSynchronizer;
use guest::GuestStore;
use notify::{Notifier, TracingNotifier};
use session::SessionProvider;
use wishlist::WishlistSynchronizer;

/// Facade wiring the client components together.
///
/// Cheaply cloneable; all components share the same session, guest store,
/// and resource cache so independently-rendered UI fragments observe the
/// same state.
#[derive(Clone)]
pub struct Storefront {
    api: Arc<ApiClient>,
    session: Arc<SessionProvider>,
    cart: CartSynchronizer<ApiClient>,
    wishlist: WishlistSynchronizer<ApiClient>,
    config: ClientConfig,
}

impl Storefront {
    /// Wire up a storefront against the configured commerce API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// guest store file is unreadable.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Like [`Storefront::new`] with a caller-supplied notification sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// guest store file is unreadable.
    pub fn with_notifier(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let session = Arc::new(SessionProvider::new());
        let api = Arc::new(ApiClient::new(config, Arc::clone(&session), notifier)?);
        let guest = Arc::new(GuestStore::open(&config.guest_store_path)?);
        let cache = ResourceCache::new();

        let cart = CartSynchronizer::new(
            Arc::clone(&api),
            Arc::clone(&session),
            Arc::clone(&guest),
            cache.clone(),
        );
        let wishlist = WishlistSynchronizer::new(
            Arc::clone(&api),
            Arc::clone(&session),
            guest,
            cache,
        );

        Ok(Self {
            api,
            session,
            cart,
            wishlist,
            config: config.clone(),
        })
    }

    /// The API gateway client.
    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// The session provider.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionProvider> {
        &self.session
    }

    /// The cart synchronizer.
    #[must_use]
    pub fn cart(&self) -> &CartSynchronizer<ApiClient> {
        &self.cart
    }

    /// The wishlist synchronizer.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistSynchronizer<ApiClient> {
        &self.wishlist
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
