//! Order submission and payment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::AddressForm;
use super::id::{AddressId, OrderId, ProductId};
use super::price::Price;

/// Shipping tier chosen at checkout.
///
/// The fee is a pure function of the method; the order API re-derives it
/// server-side, but the client shows a running total at every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    /// Flat shipping fee for this tier.
    #[must_use]
    pub fn fee(self) -> Price {
        match self {
            Self::Standard => Price::from_dong(30_000),
            Self::Express => Price::from_dong(50_000),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard (3-5 days)",
            Self::Express => "Express (1-2 days)",
        }
    }
}

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Pay the courier on delivery. The order is final at submission.
    #[default]
    CashOnDelivery,
    /// Bank transfer via QR code. Requires external settlement, so order
    /// submission hands off to the payment polling flow.
    BankQr,
}

impl PaymentMethod {
    /// Whether this method settles through an external payment provider
    /// after order creation.
    #[must_use]
    pub const fn requires_settlement(self) -> bool {
        match self {
            Self::CashOnDelivery => false,
            Self::BankQr => true,
        }
    }
}

/// Payment state reported by the payment status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// A terminal status: no further polling is meaningful.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One line of an order intent: product and quantity only.
///
/// Prices are deliberately absent; the order API re-derives them so a stale
/// client snapshot can never fix the charged amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Shipping destination: an existing address record or an inline form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ShippingAddress {
    /// Reference to a persisted address.
    Existing { address_id: AddressId },
    /// A validated inline address shipped with the order.
    Inline { address: AddressForm },
}

/// A complete order intent, built across the checkout steps and submitted
/// once. Immutable after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntent {
    pub items: Vec<OrderLine>,
    #[serde(flatten)]
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An order as returned by the order API after creation or from history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: String,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    pub sub_total: Price,
    pub shipping_fee: Price,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

/// A payment session for an order that settles externally.
///
/// Created once per order after submission; the status is polled until
/// terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub order_id: OrderId,
    /// URL of the QR artifact the buyer scans to pay.
    pub payment_url: String,
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_fees() {
        assert_eq!(ShippingMethod::Standard.fee(), Price::from_dong(30_000));
        assert_eq!(ShippingMethod::Express.fee(), Price::from_dong(50_000));
    }

    #[test]
    fn test_payment_method_settlement() {
        assert!(!PaymentMethod::CashOnDelivery.requires_settlement());
        assert!(PaymentMethod::BankQr.requires_settlement());
    }

    #[test]
    fn test_payment_status_terminality() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn test_payment_status_wire_format() {
        let status: PaymentStatus = serde_json::from_str("\"COMPLETED\"").expect("deserialize");
        assert_eq!(status, PaymentStatus::Completed);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).expect("serialize"),
            "\"CASH_ON_DELIVERY\""
        );
    }

    #[test]
    fn test_order_intent_serializes_existing_address_reference() {
        let intent = OrderIntent {
            items: vec![OrderLine {
                product_id: ProductId::new("prod-1"),
                quantity: 2,
            }],
            shipping_address: ShippingAddress::Existing {
                address_id: AddressId::new("addr-1"),
            },
            payment_method: PaymentMethod::CashOnDelivery,
            shipping_method: ShippingMethod::Standard,
            note: None,
        };

        let json = serde_json::to_value(&intent).expect("serialize");
        assert_eq!(json["addressId"], "addr-1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert!(json.get("note").is_none());
    }
}
