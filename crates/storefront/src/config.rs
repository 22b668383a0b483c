//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LOTUS_API_BASE_URL` - Base URL of the commerce API
//!   (e.g., `http://localhost:8080/api`)
//!
//! ## Optional
//! - `LOTUS_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `LOTUS_PAYMENT_POLL_INTERVAL_SECS` - Payment status poll cadence
//!   (default: 5)
//! - `LOTUS_PAYMENT_REDIRECT_GRACE_SECS` - Delay before the post-payment
//!   redirect (default: 3)
//! - `LOTUS_PAYMENT_MAX_CHECKS` - Poll attempts before giving up
//!   (default: 60)
//! - `LOTUS_GUEST_STORE_PATH` - Guest cart/wishlist file
//!   (default: `.lotus/guest.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the commerce API. Endpoint paths are joined onto this.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Cadence of payment status checks.
    pub payment_poll_interval: Duration,
    /// Delay between a completed payment and the order-detail redirect,
    /// so the buyer can read the confirmation.
    pub payment_redirect_grace: Duration,
    /// Status checks before the payment flow gives up.
    pub payment_max_checks: u32,
    /// Path of the guest cart/wishlist JSON file.
    pub guest_store_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("LOTUS_API_BASE_URL")?)?;
        let request_timeout =
            Duration::from_secs(get_parsed_or_default("LOTUS_REQUEST_TIMEOUT_SECS", 10)?);
        let payment_poll_interval =
            Duration::from_secs(get_parsed_or_default("LOTUS_PAYMENT_POLL_INTERVAL_SECS", 5)?);
        let payment_redirect_grace =
            Duration::from_secs(get_parsed_or_default("LOTUS_PAYMENT_REDIRECT_GRACE_SECS", 3)?);
        let payment_max_checks = get_parsed_or_default("LOTUS_PAYMENT_MAX_CHECKS", 60)?;
        let guest_store_path = PathBuf::from(get_env_or_default(
            "LOTUS_GUEST_STORE_PATH",
            ".lotus/guest.json",
        ));

        Ok(Self {
            api_base_url,
            request_timeout,
            payment_poll_interval,
            payment_redirect_grace,
            payment_max_checks,
            guest_store_path,
        })
    }
}

/// Parse and normalize the API base URL.
///
/// A trailing slash matters to `Url::join`: without one the last path
/// segment is replaced instead of appended.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_API_BASE_URL".to_string(), e.to_string()))
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, falling back to a default.
fn get_parsed_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/api").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/");

        let joined = url.join("cart/add").expect("join");
        assert_eq!(joined.as_str(), "http://localhost:8080/api/cart/add");
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("http://localhost:8080/api/").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }
}
