//! Typed wrappers over the ByteMe backend's REST endpoints.
//!
//! Every service is a thin, cloneable handle over the shared
//! [`ApiClient`](crate::http::ApiClient). Role-based filtering happens
//! server-side; these wrappers only shape requests and responses.

pub mod analytics;
pub mod customers;
pub mod orders;
pub mod vendor_access;
pub mod vendors;

pub use analytics::AnalyticsService;
pub use customers::CustomerService;
pub use orders::OrderService;
pub use vendor_access::VendorAccessService;
pub use vendors::VendorService;

use serde::{Deserialize, Serialize};

/// Reporting window accepted by the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    /// Last 7 days.
    #[serde(rename = "7d")]
    #[default]
    Week,
    /// Last 30 days.
    #[serde(rename = "30d")]
    Month,
    /// Last 90 days.
    #[serde(rename = "90d")]
    Quarter,
}

impl Period {
    /// The query-string value the backend expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            _ => Err(format!("invalid period: {s} (expected 7d, 30d or 90d)")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_period_wire_values() {
        assert_eq!(Period::Week.as_str(), "7d");
        assert_eq!(Period::Month.as_str(), "30d");
        assert_eq!(Period::Quarter.as_str(), "90d");
        assert_eq!("30d".parse::<Period>().unwrap(), Period::Month);
        assert!("1y".parse::<Period>().is_err());
    }
}
