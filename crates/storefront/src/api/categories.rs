//! Category tree endpoints.
//!
//! Public reads like the product catalog: no session required.

use reqwest::Method;
use tracing::instrument;

use lotus_threads_core::{Category, CategoryId};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List every active category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.request(Method::GET, "categories", None).await
    }

    /// List root categories with their first level of children.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn root_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.request(Method::GET, "categories/root", None).await
    }

    /// Get a category by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, ApiError> {
        self.request(Method::GET, &format!("categories/{slug}"), None)
            .await
    }

    /// List the direct subcategories of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn subcategories(&self, id: &CategoryId) -> Result<Vec<Category>, ApiError> {
        self.request(Method::GET, &format!("categories/{id}/subcategories"), None)
            .await
    }
}
