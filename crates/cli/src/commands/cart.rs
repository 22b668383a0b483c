//! Cart commands. Guest or account mode is decided by the session.

use lotus_threads_core::ProductId;
use lotus_threads_storefront::Storefront;

/// Show cart lines and totals.
///
/// # Errors
///
/// Returns an error if the cart cannot be read.
pub async fn list(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let items = store.cart().items().await?;
    if items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for item in &items {
        println!(
            "  {}  {} x{}  = {}",
            item.product_id,
            item.product_name,
            item.quantity,
            item.sub_total
        );
    }
    println!(
        "Total: {} ({} items)",
        store.cart().total().await?,
        store.cart().item_count().await?
    );
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error on invalid quantity, insufficient stock, or a failed
/// request.
pub async fn add(
    store: &Storefront,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    store
        .cart()
        .add_item(&ProductId::new(product_id), quantity)
        .await?;
    println!("Added {product_id} x{quantity} to cart.");
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the line is absent, the quantity invalid, or the
/// request fails.
pub async fn update(
    store: &Storefront,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    store
        .cart()
        .update_item(&ProductId::new(product_id), quantity)
        .await?;
    println!("Updated {product_id} to x{quantity}.");
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn remove(store: &Storefront, product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.cart().remove_item(&ProductId::new(product_id)).await?;
    println!("Removed {product_id} from cart.");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn clear(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    store.cart().clear().await?;
    println!("Cart cleared.");
    Ok(())
}
