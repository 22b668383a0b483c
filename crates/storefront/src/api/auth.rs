//! Authentication endpoints: login, refresh, profile, logout.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use lotus_threads_core::UserId;

use super::{ApiClient, ApiError, ApiResponse};
use crate::session::Session;

/// Access/refresh token pair issued by the auth endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPair {
    access_token: String,
    refresh_token: String,
}

/// Account profile as returned by `auth/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserProfile {
    id: UserId,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

impl ApiClient {
    /// Log in with credentials and establish a session.
    ///
    /// Obtains a token pair, then fetches the profile to populate the
    /// session identity. A failed profile fetch tears the session back
    /// down so a half-established identity never lingers.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid credentials or any transport failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let tokens: TokenPair = self
            .request(
                Method::POST,
                "auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        // Establish a provisional session so the profile fetch is
        // authenticated, then fill in the identity.
        self.session().establish(Session {
            user_id: UserId::new(""),
            email: email.to_owned(),
            display_name: String::new(),
            access_token: SecretString::from(tokens.access_token),
            refresh_token: SecretString::from(tokens.refresh_token),
        });

        let profile: UserProfile = match self.request(Method::GET, "auth/profile", None).await {
            Ok(profile) => profile,
            Err(e) => {
                self.session().clear();
                return Err(e);
            }
        };

        let current = self.session().current().ok_or(ApiError::Unauthorized)?;
        self.session().establish(Session {
            user_id: profile.id,
            email: profile.email,
            display_name: format!("{} {}", profile.first_name, profile.last_name)
                .trim()
                .to_owned(),
            access_token: current.access_token,
            refresh_token: current.refresh_token,
        });

        Ok(())
    }

    /// Create a new account.
    ///
    /// Registration does not sign the account in; the caller follows up
    /// with [`ApiClient::login`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected fields (taken email, short
    /// password) or any transport failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        self.request_empty(
            Method::POST,
            "auth/register",
            Some(json!({
                "email": email,
                "firstName": first_name,
                "lastName": last_name,
                "password": password,
            })),
        )
        .await
    }

    /// Sign out: best-effort server revocation, then local teardown.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.session().is_authenticated() {
            if let Err(e) = self.request_empty(Method::POST, "auth/logout", None).await {
                tracing::debug!(error = %e, "logout revocation failed; clearing locally");
            }
        }
        self.session().clear();
    }

    /// Exchange the refresh token for a fresh token pair.
    ///
    /// Issued outside the main request loop so a refresh can never recurse
    /// into another refresh.
    pub(crate) async fn refresh_session(&self) -> Result<(), ApiError> {
        let refresh_token = self
            .session()
            .refresh_token()
            .ok_or(ApiError::Unauthorized)?;

        let url = self.base_url().join("auth/refresh")?;
        let response = self
            .http()
            .post(url)
            .json(&json!({ "refreshToken": refresh_token.expose_secret() }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Unauthorized);
        }

        let envelope: ApiResponse<TokenPair> =
            serde_json::from_str(&response.text().await.map_err(ApiError::Network)?)?;
        let tokens = envelope.data.ok_or(ApiError::Unauthorized)?;

        self.session().replace_tokens(
            SecretString::from(tokens.access_token),
            SecretString::from(tokens.refresh_token),
        );
        Ok(())
    }
}
