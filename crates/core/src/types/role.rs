//! Administrator roles.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid admin role: {0}")]
pub struct RoleError(pub String);

/// The two classes of ByteMe administrators.
///
/// The role is taken from the authenticated profile returned by the backend
/// and is immutable for the lifetime of a session. It determines both which
/// console surfaces are reachable and how the backend scopes data:
///
/// - [`GeneralAdmin`](Self::GeneralAdmin) sees every vendor, customer and
///   order on the platform.
/// - [`MultiVendorAdmin`](Self::MultiVendorAdmin) sees only the vendors that
///   have granted it access.
///
/// The wire strings (`admin` / `multi_vendor_admin`) match the backend's
/// login and OAuth payloads and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Platform-wide administrator with unrestricted access.
    #[serde(rename = "admin")]
    GeneralAdmin,
    /// Administrator scoped to explicitly granted vendors.
    MultiVendorAdmin,
}

impl AdminRole {
    /// Whether this role is restricted to granted vendors.
    #[must_use]
    pub const fn is_vendor_scoped(self) -> bool {
        matches!(self, Self::MultiVendorAdmin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GeneralAdmin => write!(f, "admin"),
            Self::MultiVendorAdmin => write!(f, "multi_vendor_admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::GeneralAdmin),
            "multi_vendor_admin" => Ok(Self::MultiVendorAdmin),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}
