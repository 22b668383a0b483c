//! Address book endpoints.

use reqwest::Method;
use tracing::instrument;

use lotus_threads_core::{Address, AddressForm, AddressId};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the account's address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.request(Method::GET, "addresses", None).await
    }

    /// Fetch the account's default address, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if no default exists or the request fails.
    #[instrument(skip(self))]
    pub async fn default_address(&self) -> Result<Address, ApiError> {
        self.request(Method::GET, "addresses/default", None).await
    }

    /// Persist a new address. The form is validated client-side first so
    /// structural problems never reach the wire.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` on a structurally-invalid form, or any
    /// transport/server error.
    #[instrument(skip(self, form))]
    pub async fn create_address(&self, form: &AddressForm) -> Result<Address, ApiError> {
        form.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        self.request(
            Method::POST,
            "addresses",
            Some(serde_json::to_value(form)?),
        )
        .await
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` on a structurally-invalid form, or any
    /// transport/server error.
    #[instrument(skip(self, form), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        id: &AddressId,
        form: &AddressForm,
    ) -> Result<Address, ApiError> {
        form.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        self.request(
            Method::PUT,
            &format!("addresses/{id}"),
            Some(serde_json::to_value(form)?),
        )
        .await
    }

    /// Mark an address as the default.
    ///
    /// The server clears the previous default atomically; callers holding a
    /// cached address list should apply
    /// [`lotus_threads_core::apply_default`] or refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not exist or the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_default_address(&self, id: &AddressId) -> Result<Address, ApiError> {
        self.request(Method::PUT, &format!("addresses/{id}/default"), None)
            .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, &format!("addresses/{id}"), None)
            .await
    }
}
