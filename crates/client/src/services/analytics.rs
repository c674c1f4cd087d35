//! Aggregate analytics: stat cards and chart series.
//!
//! All figures are computed and role-filtered server-side; a multi-vendor
//! admin only ever receives numbers for their granted vendors.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use byteme_core::VendorId;

use super::Period;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::services::vendors::VendorSummary;

/// Platform-wide stat card figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vendors: u64,
    pub total_customers: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Month-over-month growth percentages, where the backend has history.
    #[serde(default)]
    pub growth: Growth,
}

/// Month-over-month growth percentages for each stat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Growth {
    pub vendors: Option<f64>,
    pub customers: Option<f64>,
    pub orders: Option<f64>,
    pub revenue: Option<f64>,
}

/// Stat card figures scoped to one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDashboardStats {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub total_orders: u64,
    pub total_revenue: f64,
    #[serde(default)]
    pub growth: Growth,
}

/// One bucket of the revenue/orders chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    /// Bucket label (e.g. a day or week name).
    pub name: String,
    pub revenue: f64,
    pub orders: u64,
}

/// One bucket of a count-over-time series (vendor/customer/order stats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Bucket label.
    pub name: String,
    pub count: u64,
}

/// Client for the `/admin` analytics endpoints.
#[derive(Clone)]
pub struct AnalyticsService {
    api: ApiClient,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Platform-wide stat cards, role-filtered server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.api.get_data("/admin/dashboard-stats").await
    }

    /// Stat cards scoped to a single vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(vendor_id = %vendor_id))]
    pub async fn vendor_dashboard_stats(
        &self,
        vendor_id: &VendorId,
    ) -> Result<VendorDashboardStats, ApiError> {
        let path = format!("/admin/vendor-dashboard-stats/{vendor_id}");
        self.api.get_data(&path).await
    }

    /// Vendor signups over the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn vendor_stats(&self, period: Period) -> Result<Vec<TrendPoint>, ApiError> {
        let path = format!("/admin/vendor-stats?period={period}");
        self.api.get_data(&path).await
    }

    /// Customer signups over the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn customer_stats(&self, period: Period) -> Result<Vec<TrendPoint>, ApiError> {
        let path = format!("/admin/customer-stats?period={period}");
        self.api.get_data(&path).await
    }

    /// Order volume over the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn order_stats(&self, period: Period) -> Result<Vec<TrendPoint>, ApiError> {
        let path = format!("/admin/order-stats?period={period}");
        self.api.get_data(&path).await
    }

    /// Revenue/orders chart series, optionally scoped to one vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn revenue_stats(
        &self,
        period: Period,
        vendor: Option<&VendorId>,
    ) -> Result<Vec<RevenuePoint>, ApiError> {
        let vendor_param = vendor.map_or("all", VendorId::as_str);
        let path = format!(
            "/admin/revenue-stats?period={period}&vendorId={}",
            urlencoding::encode(vendor_param)
        );
        self.api.get_data(&path).await
    }

    /// Vendors visible to the authenticated admin (all of them for a general
    /// admin, granted ones for a multi-vendor admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self))]
    pub async fn vendors_for_admin(&self) -> Result<Vec<VendorSummary>, ApiError> {
        self.api.get_data("/admin/vendors").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_stats_deserializes_with_partial_growth() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalVendors": 12,
            "totalCustomers": 340,
            "totalOrders": 1520,
            "totalRevenue": 185000.50,
            "growth": {"orders": 4.2, "revenue": -1.3},
        }))
        .unwrap();
        assert_eq!(stats.total_orders, 1520);
        assert_eq!(stats.growth.orders, Some(4.2));
        assert_eq!(stats.growth.vendors, None);
    }

    #[test]
    fn test_dashboard_stats_growth_defaults_when_absent() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalVendors": 1,
            "totalCustomers": 2,
            "totalOrders": 3,
            "totalRevenue": 4.0,
        }))
        .unwrap();
        assert_eq!(stats.growth, Growth::default());
    }

    #[test]
    fn test_revenue_point_matches_chart_keys() {
        let point: RevenuePoint = serde_json::from_value(serde_json::json!({
            "name": "Mon",
            "revenue": 1250.0,
            "orders": 18,
        }))
        .unwrap();
        assert_eq!(point.name, "Mon");
        assert_eq!(point.orders, 18);
    }
}
