//! Place an order from the current cart, then hand off to the payment
//! watch when the method settles externally.

use lotus_threads_core::{AddressId, PaymentMethod, ShippingMethod};
use lotus_threads_storefront::Storefront;
use lotus_threads_storefront::checkout::{AddressChoice, CheckoutFlow, SubmitOutcome};

use super::pay;

/// Run the full checkout over the current cart contents.
///
/// # Errors
///
/// Returns an error if the cart is empty, the flow input is incomplete, or
/// order submission fails.
pub async fn run(
    store: &Storefront,
    address_id: &str,
    payment: PaymentMethod,
    shipping: ShippingMethod,
    note: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = store.cart().items().await?;
    let mut flow = CheckoutFlow::new(items)?;

    flow.choose_address(AddressChoice::Existing(AddressId::new(address_id)))?;
    flow.next()?;
    flow.choose_payment_method(payment)?;
    flow.choose_shipping_method(shipping)?;
    if let Some(note) = note {
        flow.set_note(note)?;
    }
    flow.next()?;

    let totals = flow.totals();
    println!(
        "Placing order: {} + {} shipping = {}",
        totals.sub_total, totals.shipping_fee, totals.total
    );

    match flow.submit(store.api().as_ref()).await? {
        SubmitOutcome::Finalized(order) => {
            store.cart().clear().await?;
            println!("Order {} placed. Pay {} on delivery.", order.id, order.total);
        }
        SubmitOutcome::AwaitPayment(order) => {
            store.cart().clear().await?;
            println!("Order {} placed. Awaiting payment of {}.", order.id, order.total);
            pay::watch(store, order.id.as_str()).await?;
        }
    }
    Ok(())
}
