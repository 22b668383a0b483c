//! Catalog browsing commands.

use lotus_threads_core::ProductId;
use lotus_threads_storefront::Storefront;
use lotus_threads_storefront::api::ProductQuery;

/// List products with optional filters.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn list(
    store: &Storefront,
    page: u32,
    size: u32,
    search: Option<String>,
    on_sale: bool,
    featured: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = ProductQuery {
        page,
        size,
        search,
        on_sale,
        featured,
    };
    let result = store.api().products(&query).await?;

    println!(
        "{} products (page {} of {}):",
        result.total,
        page + 1,
        result.pages.max(1)
    );
    for product in &result.data {
        let sale = if product.on_sale { " [SALE]" } else { "" };
        let stock = if product.in_stock {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        println!(
            "  {}  {}  {}{sale}  ({stock})",
            product.id,
            product.name,
            product.effective_price()
        );
    }
    Ok(())
}

/// List categories, either the flat set or the root tree.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn categories(store: &Storefront, root: bool) -> Result<(), Box<dyn std::error::Error>> {
    let categories = if root {
        store.api().root_categories().await?
    } else {
        store.api().categories().await?
    };

    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    for category in &categories {
        println!(
            "  {}  {}  ({} products)",
            category.slug, category.name, category.product_count
        );
        for child in &category.children {
            println!("    {}  {}  ({} products)", child.slug, child.name, child.product_count);
        }
    }
    Ok(())
}

/// Show one category and its direct subcategories.
///
/// # Errors
///
/// Returns an error if the category does not exist or the request fails.
pub async fn category(store: &Storefront, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let category = store.api().category_by_slug(slug).await?;

    println!("{}  ({})", category.name, category.slug);
    if let Some(parent) = &category.parent_name {
        println!("  Parent:   {parent}");
    }
    println!("  Products: {}", category.product_count);
    if !category.description.is_empty() {
        println!("  {}", category.description);
    }

    let children = store.api().subcategories(&category.id).await?;
    if !children.is_empty() {
        println!("  Subcategories:");
        for child in &children {
            println!("    {}  {}", child.slug, child.name);
        }
    }
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show(store: &Storefront, product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = store.api().product(&ProductId::new(product_id)).await?;

    println!("{}  ({})", product.name, product.id);
    println!("  Category: {}", product.category_name);
    match product.discount_price {
        Some(discount) if discount < product.price => {
            println!("  Price:    {discount}  (was {})", product.price);
        }
        _ => println!("  Price:    {}", product.price),
    }
    println!("  Stock:    {}", product.stock);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    Ok(())
}
