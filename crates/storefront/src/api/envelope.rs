//! The canonical API response envelope.
//!
//! Every endpoint wraps its payload as `{ success, message, data }`; list
//! endpoints nest a `{ data, total, pages }` page inside `data`. This is the
//! single envelope shape for the whole client.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The standard response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Total matching items across all pages.
    #[serde(default)]
    pub total: u64,
    /// Total pages.
    #[serde(default)]
    pub pages: u32,
}

/// Error body shape for 4xx responses: an optional message plus optional
/// per-field validation errors (string or array of strings per field).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, serde_json::Value>>,
}

impl ErrorBody {
    /// Best-effort parse; an unparseable body is an empty error body.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Flatten per-field errors into lists of messages.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Some(errors) = &self.errors else {
            return BTreeMap::new();
        };
        errors
            .iter()
            .map(|(field, value)| {
                let messages = match value {
                    serde_json::Value::String(s) => vec![s.clone()],
                    serde_json::Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                        .collect(),
                    other => vec![other.to_string()],
                };
                (field.clone(), messages)
            })
            .collect()
    }
}
