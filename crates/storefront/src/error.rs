//! Crate-level error type.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::guest::GuestStoreError;

/// Convenience alias for crate-level results.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Any error the storefront client can produce.
///
/// Component-level errors stay typed at their seams ([`ApiError`],
/// [`CartError`], ...); this umbrella exists for callers that drive several
/// components through one fallible path.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Guest(#[from] GuestStoreError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
