//! End-to-end checkout flow scenarios against the in-memory API.

mod common;

use std::sync::atomic::Ordering;

use lotus_threads_core::{CartItem, PaymentMethod, Price, ShippingMethod};
use lotus_threads_storefront::checkout::{
    AddressChoice, CheckoutError, CheckoutFlow, CheckoutStep, SubmitOutcome,
};

use common::{FakeCommerce, address_form, product};

fn selection() -> Vec<CartItem> {
    vec![
        CartItem::from_product(&product("prod-1", 200_000, 10), 2),
        CartItem::from_product(&product("prod-2", 150_000, 10), 1),
    ]
}

fn ready_flow(payment: PaymentMethod) -> CheckoutFlow {
    let mut flow = CheckoutFlow::new(selection()).expect("non-empty selection");
    flow.choose_address(AddressChoice::Inline(address_form()))
        .expect("choose address");
    flow.next().expect("to payment");
    flow.choose_payment_method(payment).expect("choose payment");
    flow.next().expect("to confirmation");
    flow
}

#[tokio::test]
async fn cash_on_delivery_finalizes_the_order() {
    let api = FakeCommerce::with_products([product("prod-1", 200_000, 10), product("prod-2", 150_000, 10)]);
    let mut flow = ready_flow(PaymentMethod::CashOnDelivery);

    let outcome = flow.submit(&api).await.expect("submit");
    let SubmitOutcome::Finalized(order) = outcome else {
        panic!("cash on delivery must finalize immediately");
    };
    assert_eq!(order.sub_total, Price::from_dong(550_000));
    assert_eq!(order.shipping_fee, Price::from_dong(30_000));
    assert_eq!(order.total, Price::from_dong(580_000));
    assert_eq!(api.create_order_calls.load(Ordering::SeqCst), 1);
    // No payment session for settled-on-delivery orders.
    assert_eq!(api.create_session_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bank_qr_hands_off_to_payment() {
    let api = FakeCommerce::with_products([product("prod-1", 200_000, 10), product("prod-2", 150_000, 10)]);
    let mut flow = ready_flow(PaymentMethod::BankQr);

    let outcome = flow.submit(&api).await.expect("submit");
    assert!(matches!(outcome, SubmitOutcome::AwaitPayment(_)));
}

#[tokio::test]
async fn submit_succeeds_at_most_once() {
    let api = FakeCommerce::with_products([product("prod-1", 200_000, 10), product("prod-2", 150_000, 10)]);
    let mut flow = ready_flow(PaymentMethod::CashOnDelivery);

    flow.submit(&api).await.expect("first submit");
    assert!(matches!(
        flow.submit(&api).await,
        Err(CheckoutError::AlreadySubmitted)
    ));
    assert!(matches!(
        flow.choose_payment_method(PaymentMethod::BankQr),
        Err(CheckoutError::AlreadySubmitted)
    ));
    assert_eq!(api.create_order_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_submit_leaves_the_flow_editable() {
    let api = FakeCommerce::with_products([product("prod-1", 200_000, 10), product("prod-2", 150_000, 10)]);
    api.reject_next_order("Insufficient stock");
    let mut flow = ready_flow(PaymentMethod::CashOnDelivery);

    assert!(matches!(
        flow.submit(&api).await,
        Err(CheckoutError::Api(_))
    ));

    // The buyer can adjust input and retry.
    flow.choose_shipping_method(ShippingMethod::Express)
        .expect("still editable");
    let outcome = flow.submit(&api).await.expect("retry");
    let SubmitOutcome::Finalized(order) = outcome else {
        panic!("expected finalized order");
    };
    assert_eq!(order.shipping_fee, Price::from_dong(50_000));
    assert_eq!(api.create_order_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn submit_requires_the_confirmation_step() {
    let api = FakeCommerce::with_products([product("prod-1", 200_000, 10)]);
    let mut flow = CheckoutFlow::new(selection()).expect("non-empty selection");
    flow.choose_address(AddressChoice::Inline(address_form()))
        .expect("choose address");
    flow.choose_payment_method(PaymentMethod::CashOnDelivery)
        .expect("choose payment");
    assert_eq!(flow.step(), CheckoutStep::Address);

    assert!(matches!(
        flow.submit(&api).await,
        Err(CheckoutError::NotAtConfirmation)
    ));
    assert_eq!(api.create_order_calls.load(Ordering::SeqCst), 0);
}
