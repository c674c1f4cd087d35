//! Order listing and status updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use byteme_core::{OrderId, VendorId};

use super::Period;
use crate::error::ApiError;
use crate::http::ApiClient;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// An order as listed in the console.
///
/// `status` and `payment_status` are kept as backend strings; the set of
/// kitchen states is vendor-configurable and not closed on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub status: String,
    pub total_amount: f64,
    pub payment_status: Option<String>,
    pub table_number: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

/// Client for the order endpoints.
#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Admin-filtered order listing, optionally scoped by vendor and window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        vendor: Option<&VendorId>,
        period: Option<Period>,
    ) -> Result<Vec<OrderSummary>, ApiError> {
        let mut params = Vec::new();
        if let Some(vendor) = vendor {
            params.push(format!("vendorId={}", urlencoding::encode(vendor.as_str())));
        }
        if let Some(period) = period {
            params.push(format!("period={period}"));
        }
        let path = if params.is_empty() {
            "/admin/orders".to_owned()
        } else {
            format!("/admin/orders?{}", params.join("&"))
        };
        self.api.get_data(&path).await
    }

    /// Fetch one order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: &OrderId) -> Result<OrderSummary, ApiError> {
        self.api.get_data(&format!("/orders/{id}")).await
    }

    /// Update an order's kitchen status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(order_id = %id, status))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: &str,
    ) -> Result<OrderSummary, ApiError> {
        self.api
            .put_data(&format!("/orders/{id}/status"), &StatusBody { status })
            .await
    }
}
