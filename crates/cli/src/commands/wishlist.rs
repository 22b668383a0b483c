//! Wishlist commands.

use lotus_threads_core::ProductId;
use lotus_threads_storefront::Storefront;

/// Show saved products.
///
/// # Errors
///
/// Returns an error if the wishlist cannot be read.
pub async fn list(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let items = store.wishlist().items().await?;
    if items.is_empty() {
        println!("Your wishlist is empty.");
        return Ok(());
    }
    for item in &items {
        let stock = if item.in_stock { "" } else { "  (out of stock)" };
        println!(
            "  {}  {}  {}{stock}",
            item.product_id, item.product_name, item.product_price
        );
    }
    Ok(())
}

/// Save a product.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn add(store: &Storefront, product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.wishlist().add(&ProductId::new(product_id)).await?;
    println!("Saved {product_id}.");
    Ok(())
}

/// Unsave a product.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn remove(
    store: &Storefront,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    store.wishlist().remove(&ProductId::new(product_id)).await?;
    println!("Removed {product_id}.");
    Ok(())
}

/// Flip a product's saved state.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn toggle(
    store: &Storefront,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let saved = store.wishlist().toggle(&ProductId::new(product_id)).await?;
    if saved {
        println!("Saved {product_id}.");
    } else {
        println!("Removed {product_id}.");
    }
    Ok(())
}

/// Empty the wishlist.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn clear(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    store.wishlist().clear().await?;
    println!("Wishlist cleared.");
    Ok(())
}
