//! Address book and order history commands. All of these require a session.

use lotus_threads_core::{AddressForm, AddressId, OrderId};
use lotus_threads_storefront::Storefront;

/// Show the signed-in identity.
///
/// # Errors
///
/// Returns an error when no session is established.
pub fn whoami(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let session = store
        .session()
        .current()
        .ok_or("Not signed in. Pass --email and --password.")?;
    println!("{} <{}>  ({})", session.display_name, session.email, session.user_id);
    Ok(())
}

/// Create a new account, then prompt to sign in.
///
/// # Errors
///
/// Returns an error if the server rejects the details or the request fails.
pub async fn register(
    store: &Storefront,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    store
        .api()
        .register(email, first_name, last_name, password)
        .await?;
    println!("Account created. Sign in by passing --email and --password to any command.");
    Ok(())
}

/// List saved addresses.
///
/// # Errors
///
/// Returns an error if unauthenticated or the request fails.
pub async fn addresses(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let addresses = store.api().addresses().await?;
    if addresses.is_empty() {
        println!("No saved addresses.");
        return Ok(());
    }
    for address in &addresses {
        let default = if address.is_default { "  [default]" } else { "" };
        println!("  {}{default}", address.id);
        println!("    {} ({})", address.recipient_name, address.phone_number);
        println!("    {}", address.formatted());
    }
    Ok(())
}

/// Save a new address.
///
/// # Errors
///
/// Returns an error if the form is incomplete or the request fails.
pub async fn add_address(
    store: &Storefront,
    form: AddressForm,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = store.api().create_address(&form).await?;
    println!("Saved address {} ({}).", address.id, address.formatted());
    Ok(())
}

/// Mark an address as the default.
///
/// # Errors
///
/// Returns an error if the address does not exist or the request fails.
pub async fn set_default_address(
    store: &Storefront,
    address_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = store
        .api()
        .set_default_address(&AddressId::new(address_id))
        .await?;
    println!("Default address is now {} ({}).", address.id, address.formatted());
    Ok(())
}

/// List past orders, newest first.
///
/// # Errors
///
/// Returns an error if unauthenticated or the request fails.
pub async fn orders(store: &Storefront, page: u32) -> Result<(), Box<dyn std::error::Error>> {
    let result = store.api().orders(page, 10).await?;
    if result.data.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    println!("{} orders (page {} of {}):", result.total, page + 1, result.pages.max(1));
    for order in &result.data {
        println!(
            "  {}  {}  {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.status,
            order.total
        );
    }
    Ok(())
}

/// Show one order.
///
/// # Errors
///
/// Returns an error if the order does not exist or the request fails.
pub async fn order(store: &Storefront, order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let order = store.api().order(&OrderId::new(order_id)).await?;
    println!("Order {}  ({})", order.id, order.status);
    println!("  Placed:   {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Shipping: {} ({})", order.shipping_method.label(), order.shipping_fee);
    println!("  Subtotal: {}", order.sub_total);
    println!("  Total:    {}", order.total);
    Ok(())
}
