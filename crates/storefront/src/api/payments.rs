//! Payment session endpoints.
//!
//! Only orders paid by bank QR pass through here; cash-on-delivery orders
//! are final at submission and never create a payment session.

use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use lotus_threads_core::{OrderId, PaymentSession, PaymentStatus};

use super::{ApiClient, ApiError};

/// Payload from `POST /payments/create/{order_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentSessionData {
    payment_url: String,
    #[serde(default)]
    status: Option<PaymentStatus>,
}

/// Payload from `GET /payments/status/{order_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentStatusData {
    status: PaymentStatus,
}

impl ApiClient {
    /// Create a payment session for an order, yielding the QR artifact URL.
    ///
    /// Sessions are created once per order; re-creating one invalidates the
    /// previous artifact, so the polling flow calls this exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, is not payable, or the
    /// request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn create_payment_session(
        &self,
        order_id: &OrderId,
    ) -> Result<PaymentSession, ApiError> {
        let data: PaymentSessionData = self
            .request(
                Method::POST,
                &format!("payments/create/{order_id}"),
                None,
            )
            .await?;
        Ok(PaymentSession {
            order_id: order_id.clone(),
            payment_url: data.payment_url,
            status: data.status.unwrap_or(PaymentStatus::Pending),
        })
    }

    /// Check the current payment status of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn payment_status(&self, order_id: &OrderId) -> Result<PaymentStatus, ApiError> {
        let data: PaymentStatusData = self
            .request(Method::GET, &format!("payments/status/{order_id}"), None)
            .await?;
        Ok(data.status)
    }
}
