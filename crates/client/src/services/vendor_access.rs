//! Vendor access grant lifecycle for multi-vendor admins.
//!
//! Grants are created and revoked by vendors through the vendor-access
//! service; the console can only list, verify and accept them.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use byteme_core::{Email, GrantId, VendorId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::VendorAccessGrant;

/// Details behind a vendor-issued registration access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedAccess {
    /// The granting vendor.
    pub vendor_id: VendorId,
    /// Vendor display name, shown on the registration form.
    pub vendor_name: String,
    /// Kind of access the token will confer.
    pub access_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptBody<'a> {
    user_email: &'a str,
}

/// Client for the `/vendor-access` endpoints.
#[derive(Clone)]
pub struct VendorAccessService {
    api: ApiClient,
}

impl VendorAccessService {
    /// Create a new vendor-access service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Verify a vendor-issued access token before registration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the token is unknown or revoked.
    #[instrument(skip(self, token))]
    pub async fn verify(&self, token: &str) -> Result<VerifiedAccess, ApiError> {
        let path = format!("/vendor-access/verify/{}", urlencoding::encode(token));
        self.api.get_data(&path).await
    }

    /// List the grants extended to the given admin email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn grants_for(&self, email: &Email) -> Result<Vec<VendorAccessGrant>, ApiError> {
        let path = format!("/vendor-access/user/{}", urlencoding::encode(email.as_str()));
        self.api.get_data(&path).await
    }

    /// Accept a pending grant on behalf of the given admin email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(grant_id = %grant_id))]
    pub async fn accept(
        &self,
        grant_id: &GrantId,
        email: &Email,
    ) -> Result<VendorAccessGrant, ApiError> {
        let path = format!("/vendor-access/{grant_id}/accept");
        self.api
            .post_data(
                &path,
                &AcceptBody {
                    user_email: email.as_str(),
                },
            )
            .await
    }
}
