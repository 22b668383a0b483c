//! Payment status polling.
//!
//! Bank-QR orders settle outside the storefront, so after submission the
//! client shows the QR artifact and watches the payment status until it
//! goes terminal. The artifact is created exactly once per flow; checks run
//! strictly sequentially on a fixed cadence, so a slow response delays the
//! next check instead of stacking requests.
//!
//! A completed payment is announced immediately, then a short grace period
//! passes before the redirect event so the buyer can read the confirmation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::instrument;

use lotus_threads_core::{OrderId, PaymentSession, PaymentStatus};

use crate::api::{ApiError, CommerceApi};
use crate::config::ClientConfig;

/// Events emitted by the polling loop, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// The payment settled. Emitted once, immediately on observation.
    Completed,
    /// Follows `Completed` after the configured grace period.
    RedirectToOrder(OrderId),
    /// The payment provider reported a terminal failure.
    Failed,
    /// The configured number of checks elapsed without a terminal status.
    /// The payment may still settle later; the order page shows the truth.
    TimedOut,
}

/// A running payment watch for one order.
///
/// Dropping the flow cancels the polling task.
#[derive(Debug)]
pub struct PaymentFlow {
    session: PaymentSession,
    events: mpsc::Receiver<PaymentEvent>,
    task: JoinHandle<()>,
}

impl PaymentFlow {
    /// Create the payment session for `order_id` and start polling.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment session cannot be created; no
    /// polling starts in that case.
    #[instrument(skip(api, config), fields(order_id = %order_id))]
    pub async fn begin<C: CommerceApi + 'static>(
        api: Arc<C>,
        order_id: OrderId,
        config: &ClientConfig,
    ) -> Result<Self, ApiError> {
        let session = api.create_payment_session(&order_id).await?;
        tracing::info!(payment_url = %session.payment_url, "payment session created");

        let (tx, events) = mpsc::channel(8);
        let task = tokio::spawn(poll_loop(
            api,
            order_id,
            tx,
            config.payment_poll_interval,
            config.payment_redirect_grace,
            config.payment_max_checks,
        ));

        Ok(Self {
            session,
            events,
            task,
        })
    }

    /// The payment session, including the QR artifact URL.
    #[must_use]
    pub fn session(&self) -> &PaymentSession {
        &self.session
    }

    /// Wait for the next event. Returns `None` once the loop has ended and
    /// all events were consumed.
    pub async fn recv(&mut self) -> Option<PaymentEvent> {
        self.events.recv().await
    }

    /// Stop polling, e.g. when the buyer navigates away.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PaymentFlow {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop<C: CommerceApi>(
    api: Arc<C>,
    order_id: OrderId,
    tx: mpsc::Sender<PaymentEvent>,
    poll_interval: Duration,
    redirect_grace: Duration,
    max_checks: u32,
) {
    let mut ticker = time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick completes immediately; consume it so the
    // first status check happens one full interval after session creation.
    ticker.tick().await;

    for check in 1..=max_checks {
        ticker.tick().await;
        match api.payment_status(&order_id).await {
            Ok(PaymentStatus::Completed) => {
                tracing::info!(order_id = %order_id, check, "payment completed");
                if tx.send(PaymentEvent::Completed).await.is_err() {
                    return;
                }
                time::sleep(redirect_grace).await;
                drop(tx.send(PaymentEvent::RedirectToOrder(order_id)).await);
                return;
            }
            Ok(PaymentStatus::Failed) => {
                tracing::warn!(order_id = %order_id, check, "payment failed");
                drop(tx.send(PaymentEvent::Failed).await);
                return;
            }
            Ok(PaymentStatus::Pending) => {}
            Err(e) if e.is_retryable() => {
                tracing::warn!(order_id = %order_id, check, error = %e, "status check failed, will retry");
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, check, error = %e, "status check failed terminally");
                drop(tx.send(PaymentEvent::Failed).await);
                return;
            }
        }
    }

    tracing::warn!(order_id = %order_id, max_checks, "payment watch timed out");
    drop(tx.send(PaymentEvent::TimedOut).await);
}

/// A payment provider callback, decoded from redirect query parameters.
///
/// When the provider redirects the buyer back with a terminal status, the
/// polling loop is redundant; callers resolve the callback directly and
/// cancel any running [`PaymentFlow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCallback {
    pub order_id: OrderId,
    pub status: PaymentStatus,
}

impl PaymentCallback {
    /// Decode a callback from a query string such as
    /// `status=COMPLETED&orderId=ord-1`. Returns `None` when either
    /// parameter is missing or unrecognized.
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        let mut status = None;
        let mut order_id = None;
        for (key, value) in
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        {
            match key.as_ref() {
                "status" => {
                    status = match value.as_ref() {
                        "COMPLETED" => Some(PaymentStatus::Completed),
                        "FAILED" => Some(PaymentStatus::Failed),
                        "PENDING" => Some(PaymentStatus::Pending),
                        _ => None,
                    };
                }
                "orderId" => order_id = Some(OrderId::new(value.into_owned())),
                _ => {}
            }
        }
        Some(Self {
            order_id: order_id?,
            status: status?,
        })
    }
}
