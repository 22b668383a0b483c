//! Watch an order's payment status until it settles.

use std::sync::Arc;

use lotus_threads_core::{OrderId, PaymentStatus};
use lotus_threads_storefront::Storefront;
use lotus_threads_storefront::payment::{PaymentCallback, PaymentEvent, PaymentFlow};

/// Resolve a provider callback without polling.
///
/// # Errors
///
/// Returns an error when the callback query is malformed.
pub fn resolve(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let callback = PaymentCallback::from_query(query)
        .ok_or("Malformed callback: expected status and orderId parameters")?;
    match callback.status {
        PaymentStatus::Completed => {
            println!("Payment received!");
            println!("See your order with: lotus account order {}", callback.order_id);
        }
        PaymentStatus::Failed => println!("Payment failed. The order was not charged."),
        PaymentStatus::Pending => {
            println!(
                "Payment still pending. Watch it with: lotus pay {}",
                callback.order_id
            );
        }
    }
    Ok(())
}

/// Create the payment session and poll until a terminal event.
///
/// # Errors
///
/// Returns an error if the payment session cannot be created.
pub async fn watch(store: &Storefront, order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut flow = PaymentFlow::begin(
        Arc::clone(store.api()),
        OrderId::new(order_id),
        store.config(),
    )
    .await?;

    println!("Scan to pay: {}", flow.session().payment_url);
    println!("Waiting for payment...");

    while let Some(event) = flow.recv().await {
        match event {
            PaymentEvent::Completed => println!("Payment received!"),
            PaymentEvent::RedirectToOrder(order_id) => {
                println!("See your order with: lotus account order {order_id}");
            }
            PaymentEvent::Failed => println!("Payment failed. The order was not charged."),
            PaymentEvent::TimedOut => {
                println!("Still no confirmation. Check the order page later: {order_id}");
            }
        }
    }
    Ok(())
}
