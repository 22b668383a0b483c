//! User-visible notification sink.
//!
//! The gateway client centralizes transient notifications for whole error
//! classes (403/404/5xx/network/timeout); the UI layer decides how to show
//! them. This trait is the seam: the CLI prints, tests record, and the
//! default logs through `tracing`.

use std::sync::Mutex;

/// A sink for transient user-visible notifications (the toast analogue).
pub trait Notifier: Send + Sync {
    /// An operation succeeded in a way the user should see.
    fn success(&self, message: &str);

    /// An operation failed in a way the user should see.
    fn error(&self, message: &str);

    /// The session could not be refreshed; the user must sign in again.
    ///
    /// The UI layer should route to the login surface with a
    /// `session=expired` indicator.
    fn session_expired(&self);
}

/// Default notifier that emits structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(message, "notification");
    }

    fn error(&self, message: &str) {
        tracing::warn!(message, "notification");
    }

    fn session_expired(&self) {
        tracing::warn!("session expired, sign-in required (login?session=expired)");
    }
}

/// Notifier that records everything it receives. Test support.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
    SessionExpired,
}

impl RecordingNotifier {
    /// Snapshot of everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(Notification::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(Notification::Error(message.to_owned()));
    }

    fn session_expired(&self) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(Notification::SessionExpired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::default();
        notifier.error("Server error occurred. Please try again later.");
        notifier.session_expired();
        notifier.success("Order placed");

        assert_eq!(
            notifier.events(),
            vec![
                Notification::Error("Server error occurred. Please try again later.".to_owned()),
                Notification::SessionExpired,
                Notification::Success("Order placed".to_owned()),
            ]
        );
    }
}
