//! Session and identity state.
//!
//! The provider is a passive token store: the HTTP side of login, refresh,
//! and profile fetching lives in [`crate::api`]. Components consult it once
//! per call to pick the remote or guest strategy, and the gateway reads the
//! access token from it on every request.

use std::sync::RwLock;

use secrecy::SecretString;

use lotus_threads_core::UserId;

/// An authenticated identity with its token pair.
#[derive(Clone)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Holds the current session, if any.
///
/// Interior mutability via `RwLock` so the gateway, synchronizers, and the
/// UI all observe the same identity. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct SessionProvider {
    current: RwLock<Option<Session>>,
}

impl SessionProvider {
    /// Create a provider with no active session (guest).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// The current access token, when authenticated.
    pub fn access_token(&self) -> Option<SecretString> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    /// The current refresh token, when authenticated.
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read().as_ref().map(|s| s.refresh_token.clone())
    }

    /// A snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Establish a session after a successful login.
    pub fn establish(&self, session: Session) {
        tracing::info!(user_id = %session.user_id, "session established");
        *self.write() = Some(session);
    }

    /// Swap in a fresh token pair after a successful refresh.
    ///
    /// No-op when signed out in the meantime.
    pub fn replace_tokens(&self, access_token: SecretString, refresh_token: SecretString) {
        if let Some(session) = self.write().as_mut() {
            session.access_token = access_token;
            session.refresh_token = refresh_token;
            tracing::debug!("session tokens refreshed");
        }
    }

    /// Drop the session (sign-out, or forced after a failed refresh).
    pub fn clear(&self) {
        let mut guard = self.write();
        if guard.is_some() {
            tracing::info!("session cleared");
        }
        *guard = None;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
