//! Vendor listing and CRUD.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use byteme_core::{Email, VendorId};

use crate::error::ApiError;
use crate::http::ApiClient;

/// A restaurant vendor as listed in the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    #[serde(rename = "_id")]
    pub id: VendorId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: u64,
}

/// Editable vendor fields. Only provided fields are updated.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Client for the vendor endpoints.
#[derive(Clone)]
pub struct VendorService {
    api: ApiClient,
}

impl VendorService {
    /// Create a new vendor service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List the vendors visible to the authenticated admin.
    ///
    /// Uses the admin-scoped endpoint so multi-vendor admins only see
    /// granted vendors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<VendorSummary>, ApiError> {
        self.api.get_data("/admin/vendors").await
    }

    /// Fetch one vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(vendor_id = %id))]
    pub async fn get(&self, id: &VendorId) -> Result<VendorSummary, ApiError> {
        self.api.get_data(&format!("/vendors/{id}")).await
    }

    /// Update a vendor's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self, update), fields(vendor_id = %id))]
    pub async fn update(
        &self,
        id: &VendorId,
        update: &VendorUpdate,
    ) -> Result<VendorSummary, ApiError> {
        self.api.put_data(&format!("/vendors/{id}"), update).await
    }

    /// Delete a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(vendor_id = %id))]
    pub async fn delete(&self, id: &VendorId) -> Result<(), ApiError> {
        self.api.delete(&format!("/vendors/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_summary_tolerates_sparse_records() {
        let vendor: VendorSummary = serde_json::from_value(serde_json::json!({
            "_id": "v1",
            "name": "Spice Hut",
            "email": "spice@byteme.lk",
        }))
        .unwrap();
        assert_eq!(vendor.id.as_str(), "v1");
        assert!(vendor.cuisine.is_none());
        assert_eq!(vendor.total_reviews, 0);
    }

    #[test]
    fn test_vendor_update_skips_absent_fields() {
        let update = VendorUpdate {
            cuisine: Some("sri lankan".to_owned()),
            ..VendorUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"cuisine": "sri lankan"}));
    }
}
