//! Shipping addresses.
//!
//! Addresses use the Vietnamese administrative hierarchy: street line(s),
//! ward, district, province/city. At most one address per account carries
//! the default flag; [`apply_default`] maintains that invariant on cached
//! copies after a set-default call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{AddressId, UserId};

/// A persisted shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub recipient_name: String,
    pub phone_number: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub ward: String,
    pub district: String,
    pub province_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub is_default: bool,
}

impl Address {
    /// One-line display form, most specific part first.
    #[must_use]
    pub fn formatted(&self) -> String {
        let mut parts = vec![self.address_line1.as_str()];
        if let Some(line2) = self.address_line2.as_deref()
            && !line2.is_empty()
        {
            parts.push(line2);
        }
        parts.extend([
            self.ward.as_str(),
            self.district.as_str(),
            self.province_city.as_str(),
        ]);
        parts.join(", ")
    }
}

/// Validation failure for an address form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required address field: {field}")]
pub struct AddressValidationError {
    /// camelCase wire name of the first missing field.
    pub field: &'static str,
}

/// Address input, for creating a new address or shipping inline.
///
/// An inline checkout address must pass the same structural validation as a
/// persisted one before it is accepted into an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub recipient_name: String,
    pub phone_number: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub ward: String,
    pub district: String,
    pub province_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressForm {
    /// Check that every required field is present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, in display order.
    pub fn validate(&self) -> Result<(), AddressValidationError> {
        let required: [(&'static str, &str); 6] = [
            ("recipientName", &self.recipient_name),
            ("phoneNumber", &self.phone_number),
            ("addressLine1", &self.address_line1),
            ("ward", &self.ward),
            ("district", &self.district),
            ("provinceCity", &self.province_city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AddressValidationError { field });
            }
        }
        Ok(())
    }
}

/// Mark `new_default` as the default address, clearing any previous default.
///
/// The server performs the same swap atomically; this keeps a cached address
/// list consistent without a refetch. After the call exactly one address has
/// `is_default == true`, provided `new_default` is present in the slice.
pub fn apply_default(addresses: &mut [Address], new_default: &AddressId) {
    for address in addresses {
        address.is_default = address.id == *new_default;
    }
}
