//! Catalog category as returned by the commerce API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A catalog category.
///
/// Categories form a tree: root categories have no `parent_id`, and the
/// tree endpoints populate `children` one level deep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Inactive categories are hidden from the storefront.
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub product_count: u32,
    #[serde(default)]
    pub children: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Whether this category sits at the top of the tree.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
