//! Product catalog endpoints.
//!
//! Catalog reads are public: they work with or without a session, so guest
//! mode can side-look-up product details when building local cart lines.

use reqwest::Method;
use tracing::instrument;

use lotus_threads_core::{Product, ProductId};

use super::{ApiClient, ApiError, Paginated};

/// Query parameters for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    /// Restrict to discounted products.
    pub on_sale: bool,
    /// Restrict to featured products.
    pub featured: bool,
}

impl ProductQuery {
    fn to_query_string(&self) -> String {
        let size = if self.size == 0 { 12 } else { self.size };
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &size.to_string());
        if let Some(search) = &self.search
            && !search.is_empty()
        {
            serializer.append_pair("search", search);
        }
        if self.on_sale {
            serializer.append_pair("onSale", "true");
        }
        if self.featured {
            serializer.append_pair("featured", "true");
        }
        serializer.finish()
    }
}

impl ApiClient {
    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.request(Method::GET, &format!("products/{id}"), None)
            .await
    }

    /// Get a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        self.request(Method::GET, &format!("products/slug/{slug}"), None)
            .await
    }

    /// List products with pagination and optional filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError> {
        self.request(
            Method::GET,
            &format!("products?{}", query.to_query_string()),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_defaults() {
        let query = ProductQuery::default();
        assert_eq!(query.to_query_string(), "page=0&size=12");
    }

    #[test]
    fn test_query_string_with_search_and_flags() {
        let query = ProductQuery {
            page: 2,
            size: 24,
            search: Some("áo thun".to_string()),
            on_sale: true,
            featured: false,
        };
        let qs = query.to_query_string();
        assert!(qs.starts_with("page=2&size=24&search="));
        assert!(qs.ends_with("&onSale=true"));
        assert!(!qs.contains("featured"));
    }

    #[test]
    fn test_query_string_escapes_reserved_characters() {
        let query = ProductQuery {
            search: Some("a&b=c d".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_query_string(),
            "page=0&size=12&search=a%26b%3Dc+d"
        );
    }
}
