//! Commerce API gateway client.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, one shared client per [`ApiClient`]
//! - Canonical response envelope `{ success, message, data }`
//! - Bearer token injected from the session provider when present
//! - 401 handling: one token refresh and one retry of the original
//!   request; a second 401 forces sign-out
//! - Centralized user-visible notifications for 403/404/422/5xx/network/
//!   timeout error classes; 400-class messages are returned to the caller
//!   for contextual handling
//!
//! Endpoint methods are grouped one module per resource: products,
//! categories, cart, wishlist, addresses, orders, payments, auth.
//!
//! # Example
//!
//! ```rust,ignore
//! use lotus_threads_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config, session, notifier)?;
//! let product = api.product(&product_id).await?;
//! api.cart_add(&product.id, 1).await?;
//! ```

mod addresses;
mod auth;
mod cart;
mod categories;
mod envelope;
mod orders;
mod payments;
mod products;
mod wishlist;

pub use envelope::{ApiResponse, Paginated};
pub use products::ProductQuery;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use lotus_threads_core::{
    Address, AddressForm, AddressId, CartItem, Order, OrderId, OrderIntent, PaymentSession,
    PaymentStatus, Product, ProductId, WishlistItem,
};

use crate::config::ClientConfig;
use crate::notify::Notifier;
use crate::session::SessionProvider;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400-class rejection with a server-provided message. Surfaced by the
    /// caller with contextual messaging, not by the gateway.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401 that survived the refresh protocol.
    #[error("Unauthorized")]
    Unauthorized,

    /// 403.
    #[error("Forbidden")]
    Forbidden,

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 422 with structured field errors.
    #[error("Validation failed: {}", format_validation(.0))]
    Validation(BTreeMap<String, Vec<String>>),

    /// 5xx. Safe to retry.
    #[error("Server error (HTTP {0})")]
    Server(u16),

    /// The request timed out. Safe to retry.
    #[error("Request timed out")]
    Timeout,

    /// Connection-level failure. Safe to retry.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The response body was not the expected shape.
    #[error("Invalid response: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint path did not join onto the base URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP succeeded but the envelope reported `success: false`.
    #[error("API rejected the request: {0}")]
    Envelope(String),
}

impl ApiError {
    /// Whether retrying the same operation is safe and potentially useful.
    ///
    /// Validation and 400-class errors will fail identically; server,
    /// network, and timeout errors may clear up.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Timeout | Self::Network(_))
    }
}

fn format_validation(errors: &BTreeMap<String, Vec<String>>) -> String {
    if errors.is_empty() {
        return "(no details)".to_string();
    }
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client for the commerce API.
///
/// Cheaply cloneable; all clones share one connection pool, session, and
/// notifier.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: url::Url,
    session: Arc<SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                session,
                notifier,
            }),
        })
    }

    /// The session provider this client authenticates against.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionProvider> {
        &self.inner.session
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    pub(crate) fn base_url(&self) -> &url::Url {
        &self.inner.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    // =========================================================================
    // Request machinery
    // =========================================================================

    /// Issue a request and deserialize the envelope's `data` into `T`.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let data = self.request_value(method, path, body).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Issue a request where the envelope's `data` is irrelevant.
    pub(crate) async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.request_value(method, path, body).await.map(|_| ())
    }

    /// Core request loop implementing the 401 refresh protocol.
    ///
    /// On the first 401 of an authenticated session, refresh the token pair
    /// once and retry the original request exactly once. A second 401, or a
    /// failed refresh, forces sign-out.
    async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let mut attempted_refresh = false;

        loop {
            let mut builder = self.inner.http.request(method.clone(), url.clone());
            if let Some(body) = &body {
                builder = builder.json(body);
            }
            // Attach the bearer token only when a session exists.
            if let Some(token) = self.inner.session.access_token() {
                builder = builder.bearer_auth(token.expose_secret());
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => return Err(self.classify_transport(e)),
            };

            if response.status() == StatusCode::UNAUTHORIZED {
                if !attempted_refresh && self.inner.session.is_authenticated() {
                    attempted_refresh = true;
                    if self.refresh_session().await.is_ok() {
                        tracing::debug!(path, "retrying request after token refresh");
                        continue;
                    }
                }
                // Second 401, refresh failure, or no session to refresh.
                self.force_sign_out();
                return Err(ApiError::Unauthorized);
            }

            return self.decode(path, response).await;
        }
    }

    /// Turn a response into envelope data, dispatching user-visible
    /// notifications for the centrally-handled error classes.
    async fn decode(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, ApiError> {
        let status = response.status();
        // Read the body as text first for better error diagnostics.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Err(self.classify_transport(e)),
        };

        if !status.is_success() {
            return Err(self.classify_failure(path, status, &body));
        }

        let envelope: ApiResponse<serde_json::Value> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    path,
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse API response envelope"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if !envelope.success {
            return Err(ApiError::Envelope(envelope.message));
        }

        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    /// Map a non-success HTTP status onto the error taxonomy.
    fn classify_failure(&self, path: &str, status: StatusCode, body: &str) -> ApiError {
        let notifier = self.notifier();
        let error_body = envelope::ErrorBody::parse(body);

        match status {
            StatusCode::FORBIDDEN => {
                notifier.error("You do not have permission to perform this action");
                ApiError::Forbidden
            }
            StatusCode::NOT_FOUND => {
                notifier.error("The requested resource was not found");
                ApiError::NotFound(path.to_owned())
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let errors = error_body.field_errors();
                if errors.is_empty() {
                    notifier.error("Validation failed");
                } else {
                    for message in errors.values().flatten() {
                        notifier.error(message);
                    }
                }
                ApiError::Validation(errors)
            }
            StatusCode::BAD_REQUEST => {
                // Component-level callers surface these with context.
                ApiError::BadRequest(
                    error_body
                        .message
                        .unwrap_or_else(|| "Invalid request".to_string()),
                )
            }
            status if status.is_server_error() => {
                tracing::error!(path, status = %status, "server error from commerce API");
                notifier.error("Server error occurred. Please try again later.");
                ApiError::Server(status.as_u16())
            }
            status => {
                tracing::warn!(path, status = %status, "unexpected status from commerce API");
                ApiError::BadRequest(format!("HTTP {status}"))
            }
        }
    }

    /// Map a transport-level failure, notifying the user.
    fn classify_transport(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            self.notifier().error("The request timed out. Please try again.");
            ApiError::Timeout
        } else {
            self.notifier()
                .error("Unable to connect to the server. Please check your internet connection.");
            ApiError::Network(error)
        }
    }

    /// Clear the session and tell the user to sign in again.
    fn force_sign_out(&self) {
        if self.inner.session.is_authenticated() {
            self.inner.session.clear();
            self.inner.notifier.session_expired();
        }
    }
}

// =============================================================================
// CommerceApi seam
// =============================================================================

/// The commerce API operations consumed by the synchronizers and flow
/// controllers. [`ApiClient`] is the production implementation; tests use an
/// in-memory fake.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Look up a product by ID (used for guest-side cart snapshots and
    /// stock bounds).
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// Fetch the authenticated account's cart lines.
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError>;
    /// Add a product to the account cart.
    async fn cart_add(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError>;
    /// Set a cart line's quantity.
    async fn cart_update(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError>;
    /// Remove a cart line.
    async fn cart_remove(&self, product_id: &ProductId) -> Result<(), ApiError>;
    /// Empty the account cart.
    async fn cart_clear(&self) -> Result<(), ApiError>;

    /// Fetch the authenticated account's wishlist.
    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError>;
    /// Add a product to the wishlist.
    async fn wishlist_add(&self, product_id: &ProductId) -> Result<(), ApiError>;
    /// Remove a product from the wishlist.
    async fn wishlist_remove(&self, product_id: &ProductId) -> Result<(), ApiError>;
    /// Empty the wishlist.
    async fn wishlist_clear(&self) -> Result<(), ApiError>;

    /// Fetch the account's address book.
    async fn addresses(&self) -> Result<Vec<Address>, ApiError>;
    /// Persist a new address.
    async fn create_address(&self, form: &AddressForm) -> Result<Address, ApiError>;
    /// Mark an address as the default, clearing the previous default.
    async fn set_default_address(&self, id: &AddressId) -> Result<Address, ApiError>;

    /// Submit an order intent. Called exactly once per checkout pass.
    async fn create_order(&self, intent: &OrderIntent) -> Result<Order, ApiError>;

    /// Create a payment session (QR artifact) for an order.
    async fn create_payment_session(&self, order_id: &OrderId)
    -> Result<PaymentSession, ApiError>;
    /// Check the payment status of an order.
    async fn payment_status(&self, order_id: &OrderId) -> Result<PaymentStatus, ApiError>;
}

#[async_trait]
impl CommerceApi for ApiClient {
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        Self::product(self, id).await
    }

    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        Self::fetch_cart(self).await
    }

    async fn cart_add(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        Self::cart_add(self, product_id, quantity).await
    }

    async fn cart_update(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        Self::cart_update(self, product_id, quantity).await
    }

    async fn cart_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        Self::cart_remove(self, product_id).await
    }

    async fn cart_clear(&self) -> Result<(), ApiError> {
        Self::cart_clear(self).await
    }

    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        Self::fetch_wishlist(self).await
    }

    async fn wishlist_add(&self, product_id: &ProductId) -> Result<(), ApiError> {
        Self::wishlist_add(self, product_id).await
    }

    async fn wishlist_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        Self::wishlist_remove(self, product_id).await
    }

    async fn wishlist_clear(&self) -> Result<(), ApiError> {
        Self::wishlist_clear(self).await
    }

    async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        Self::addresses(self).await
    }

    async fn create_address(&self, form: &AddressForm) -> Result<Address, ApiError> {
        Self::create_address(self, form).await
    }

    async fn set_default_address(&self, id: &AddressId) -> Result<Address, ApiError> {
        Self::set_default_address(self, id).await
    }

    async fn create_order(&self, intent: &OrderIntent) -> Result<Order, ApiError> {
        Self::create_order(self, intent).await
    }

    async fn create_payment_session(
        &self,
        order_id: &OrderId,
    ) -> Result<PaymentSession, ApiError> {
        Self::create_payment_session(self, order_id).await
    }

    async fn payment_status(&self, order_id: &OrderId) -> Result<PaymentStatus, ApiError> {
        Self::payment_status(self, order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("products/prod-404".to_string());
        assert_eq!(err.to_string(), "Not found: products/prod-404");

        let err = ApiError::BadRequest("quantity exceeds stock".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity exceeds stock");
    }

    #[test]
    fn test_validation_error_formatting() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "phoneNumber".to_string(),
            vec!["must be numeric".to_string()],
        );
        errors.insert("ward".to_string(), vec!["is required".to_string()]);
        let err = ApiError::Validation(errors);
        assert_eq!(
            err.to_string(),
            "Validation failed: phoneNumber: must be numeric; ward: is required"
        );
    }

    #[test]
    fn test_validation_error_no_details() {
        let err = ApiError::Validation(BTreeMap::new());
        assert_eq!(err.to_string(), "Validation failed: (no details)");
    }

    #[test]
    fn test_retryability() {
        assert!(ApiError::Server(500).is_retryable());
        assert!(ApiError::Timeout.is_retryable());
        assert!(!ApiError::BadRequest("nope".to_string()).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::Validation(BTreeMap::new()).is_retryable());
    }
}
