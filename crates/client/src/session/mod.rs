//! The client-held administrator session.
//!
//! A session is one atomic record: bearer token, profile and (for
//! multi-vendor admins) the lazily loaded vendor access grants. Keeping the
//! record atomic makes "token without profile" and "two roles active at
//! once" unrepresentable rather than merely discouraged.

mod store;

pub use store::{FileStorage, MemoryStorage, SessionStore, StorageBackend, StorageError};

use serde::{Deserialize, Serialize};

use byteme_core::{AdminId, AdminRole, Email, GrantId, VendorId};

/// Identity record of an authenticated administrator, as returned by the
/// backend's login and OAuth endpoints.
///
/// Unknown role-specific fields are carried through `extra` so that a
/// persisted profile survives backend additions without data loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Backend object ID.
    #[serde(rename = "_id")]
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Role, as issued by the backend. Immutable after login.
    pub role: AdminRole,
    /// Role-specific fields the console does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Permission a vendor has extended to a multi-vendor admin.
///
/// Read-only from the admin's perspective; created and revoked by the
/// vendor-access service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAccessGrant {
    /// Backend object ID of the grant.
    #[serde(rename = "_id")]
    pub id: GrantId,
    /// The granting vendor.
    pub vendor_id: VendorId,
    /// Vendor display name.
    pub vendor_name: String,
    /// Kind of access extended (opaque to the console, e.g. `view`).
    pub access_type: String,
    /// Grant lifecycle state.
    #[serde(default)]
    pub status: GrantStatus,
}

/// Lifecycle state of a [`VendorAccessGrant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    /// Extended by the vendor, not yet accepted by the admin.
    #[default]
    Pending,
    /// Accepted and active.
    Accepted,
    /// Revoked by the vendor.
    Revoked,
}

/// One authenticated principal: bearer token, profile and vendor grants.
///
/// Token and profile are always written and read together; there is no
/// observable state in which only one of them exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Opaque bearer credential for authenticated requests.
    pub token: String,
    /// The authenticated identity.
    pub profile: AdminProfile,
    /// Vendor access grants. Empty until loaded; only ever populated for
    /// multi-vendor admins.
    #[serde(default)]
    pub vendor_grants: Vec<VendorAccessGrant>,
}

impl AdminSession {
    /// Create a fresh session from a login or OAuth payload.
    #[must_use]
    pub const fn new(token: String, profile: AdminProfile) -> Self {
        Self {
            token,
            profile,
            vendor_grants: Vec::new(),
        }
    }

    /// The session's role, taken from the profile.
    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.profile.role
    }

    /// The authenticated admin's ID.
    #[must_use]
    pub const fn admin_id(&self) -> &AdminId {
        &self.profile.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn general_profile() -> AdminProfile {
        serde_json::from_value(serde_json::json!({
            "_id": "66f1a2b3c4d5e6f7a8b9c0d1",
            "name": "Platform Admin",
            "email": "admin@byteme.lk",
            "role": "admin",
        }))
        .unwrap()
    }

    pub(crate) fn multi_vendor_profile() -> AdminProfile {
        serde_json::from_value(serde_json::json!({
            "_id": "66f1a2b3c4d5e6f7a8b9c0d2",
            "name": "MV Admin",
            "email": "mv@byteme.lk",
            "role": "multi_vendor_admin",
        }))
        .unwrap()
    }

    #[test]
    fn test_profile_deserializes_backend_payload() {
        let profile: AdminProfile = serde_json::from_value(serde_json::json!({
            "_id": "66f1a2b3c4d5e6f7a8b9c0d1",
            "name": "Platform Admin",
            "email": "admin@byteme.lk",
            "role": "admin",
            "avatarUrl": "https://cdn.byteme.lk/a.png",
        }))
        .unwrap();

        assert_eq!(profile.role, AdminRole::GeneralAdmin);
        assert_eq!(profile.id.as_str(), "66f1a2b3c4d5e6f7a8b9c0d1");
        assert!(profile.extra.contains_key("avatarUrl"));
    }

    #[test]
    fn test_session_roundtrip_preserves_extra_fields() {
        let mut session = AdminSession::new("tok-1".to_owned(), general_profile());
        session
            .profile
            .extra
            .insert("phone".to_owned(), serde_json::json!("+94 11 000 0000"));

        let raw = serde_json::to_string(&session).unwrap();
        let back: AdminSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_grant_defaults_to_pending() {
        let grant: VendorAccessGrant = serde_json::from_value(serde_json::json!({
            "_id": "g1",
            "vendorId": "v1",
            "vendorName": "Spice Hut",
            "accessType": "view",
        }))
        .unwrap();
        assert_eq!(grant.status, GrantStatus::Pending);
    }

    #[test]
    fn test_session_role_comes_from_profile() {
        let session = AdminSession::new("tok".to_owned(), multi_vendor_profile());
        assert_eq!(session.role(), AdminRole::MultiVendorAdmin);
        assert!(session.vendor_grants.is_empty());
    }
}
