//! Customer listing and CRUD.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use byteme_core::{CustomerId, Email, VendorId};

use super::Period;
use crate::error::ApiError;
use crate::http::ApiClient;

/// A platform customer as listed in the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Editable customer fields. Only provided fields are updated.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Client for the customer endpoints.
#[derive(Clone)]
pub struct CustomerService {
    api: ApiClient,
}

impl CustomerService {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every customer (general admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CustomerSummary>, ApiError> {
        self.api.get_data("/users").await
    }

    /// Admin-filtered aggregate listing, optionally scoped by vendor and
    /// window (multi-vendor dashboard view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn list_filtered(
        &self,
        vendor: Option<&VendorId>,
        period: Option<Period>,
    ) -> Result<Vec<CustomerSummary>, ApiError> {
        let mut params = Vec::new();
        if let Some(vendor) = vendor {
            params.push(format!("vendorId={}", urlencoding::encode(vendor.as_str())));
        }
        if let Some(period) = period {
            params.push(format!("period={period}"));
        }
        let path = if params.is_empty() {
            "/admin/customers".to_owned()
        } else {
            format!("/admin/customers?{}", params.join("&"))
        };
        self.api.get_data(&path).await
    }

    /// Fetch one customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: &CustomerId) -> Result<CustomerSummary, ApiError> {
        self.api.get_data(&format!("/users/{id}")).await
    }

    /// Update a customer's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self, update), fields(customer_id = %id))]
    pub async fn update(
        &self,
        id: &CustomerId,
        update: &CustomerUpdate,
    ) -> Result<CustomerSummary, ApiError> {
        self.api.put_data(&format!("/users/{id}"), update).await
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: &CustomerId) -> Result<(), ApiError> {
        self.api.delete(&format!("/users/{id}")).await
    }
}
