//! Authentication controller: login, logout, registration, password
//! recovery and OAuth callback ingestion.
//!
//! The controller is the single source of truth for "who is logged in and
//! what can they do". It owns an [`AuthState`] machine that starts in
//! `Initializing`, resolves to `Unauthenticated` or `Authenticated` during
//! [`AuthController::initialize`], and cycles between those two for the
//! lifetime of the process. There is no terminal state.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::instrument;
use url::Url;

use byteme_core::{AdminRole, Email};

use crate::error::{ApiError, AuthError};
use crate::http::ApiClient;
use crate::services::VendorAccessService;
use crate::session::{AdminProfile, AdminSession, SessionStore};

/// OAuth callback query parameter carrying the bearer token.
const PARAM_TOKEN: &str = "token";
/// OAuth callback query parameter flagging a Google sign-in.
const PARAM_GOOGLE_AUTH: &str = "googleAuth";
/// OAuth callback query parameter carrying the URL-encoded profile JSON.
const PARAM_USER_DATA: &str = "userData";

/// Client-side authentication state.
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    /// Application start; the stored session has not been resolved yet.
    /// Route guards must not redirect out of this state.
    #[default]
    Initializing,
    /// No session. Protected surfaces redirect to the landing page.
    Unauthenticated,
    /// An admin is logged in.
    Authenticated(AdminSession),
}

impl AuthState {
    /// Whether any admin is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The current session, if authenticated.
    #[must_use]
    pub const fn session(&self) -> Option<&AdminSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Initializing | Self::Unauthenticated => None,
        }
    }
}

/// Login form credentials.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// Registration payload for a general admin.
#[derive(Debug)]
pub struct GeneralRegistration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

/// Registration payload for a multi-vendor admin, carrying the
/// vendor-issued access token that authorizes the signup.
#[derive(Debug)]
pub struct MultiVendorRegistration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
    pub access_token: String,
}

/// Wire shape of the two login endpoints.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    token: Option<String>,
    user: Option<AdminProfile>,
    message: Option<String>,
}

/// Wire shape of the registration and password-recovery endpoints:
/// `{success, message}` with no session payload.
#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// Special characters the password policy accepts.
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// The access controller.
///
/// Cheap to clone; all clones share one state machine and one session
/// store. The predicates ([`is_authenticated`](Self::is_authenticated) and
/// friends) are pure reads of current in-memory state and are never stale.
#[derive(Clone)]
pub struct AuthController {
    inner: Arc<AuthControllerInner>,
}

struct AuthControllerInner {
    api: ApiClient,
    store: SessionStore,
    vendor_access: VendorAccessService,
    state: RwLock<AuthState>,
}

impl AuthController {
    /// Create a controller in the `Initializing` state.
    #[must_use]
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        let vendor_access = VendorAccessService::new(api.clone());
        Self {
            inner: Arc::new(AuthControllerInner {
                api,
                store,
                vendor_access,
                state: RwLock::new(AuthState::Initializing),
            }),
        }
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Resolve the initial authentication state.
    ///
    /// Loads any stored session, then - if a startup URL is given - ingests
    /// an OAuth callback from it. Callback ingestion runs second and wins
    /// over the stored session by overwriting it. Returns the callback URL
    /// with the OAuth parameters stripped, when one was ingested, so the
    /// caller can rewrite its location and avoid re-ingesting on reload.
    pub async fn initialize(&self, startup_url: Option<&Url>) -> Option<Url> {
        {
            let mut state = self.inner.state.write().await;
            *state = match self.inner.store.load() {
                Some(session) => AuthState::Authenticated(session),
                None => AuthState::Unauthenticated,
            };
        }

        if let Some(url) = startup_url {
            return self.ingest_oauth_callback(url).await;
        }
        None
    }

    /// Ingest a Google OAuth callback URL.
    ///
    /// Requires all three of `token`, `googleAuth` and `userData` query
    /// parameters; otherwise the URL is not a callback and `None` is
    /// returned. Malformed `userData` is logged and ignored, leaving the
    /// current state exactly as it was. On success the session is persisted
    /// under the role parsed from the profile and the sanitized URL is
    /// returned.
    #[instrument(skip(self, url))]
    pub async fn ingest_oauth_callback(&self, url: &Url) -> Option<Url> {
        let mut token = None;
        let mut google_auth = false;
        let mut user_data = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                PARAM_TOKEN => token = Some(value.into_owned()),
                PARAM_GOOGLE_AUTH => google_auth = true,
                PARAM_USER_DATA => user_data = Some(value.into_owned()),
                _ => {}
            }
        }

        let (token, user_data) = match (token, google_auth, user_data) {
            (Some(token), true, Some(user_data)) => (token, user_data),
            _ => return None,
        };

        let profile: AdminProfile = match serde_json::from_str(&user_data) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(error = %e, "malformed OAuth callback payload; ignoring");
                return None;
            }
        };

        tracing::info!(role = %profile.role, "ingested Google OAuth callback");
        let session = AdminSession::new(token, profile);
        self.install_session(session).await;
        Some(Self::strip_oauth_params(url))
    }

    // =========================================================================
    // Login / logout
    // =========================================================================

    /// Log in through the given portal's endpoint.
    ///
    /// The resulting role is taken from the returned profile, not from
    /// `portal`. For multi-vendor admins the vendor access grants are
    /// loaded after login; a grants failure is logged and the login still
    /// succeeds with empty grants.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the backend rejects
    /// the credentials, [`AuthError::Api`] for transport failures. Expected
    /// failures never panic and never touch stored state.
    #[instrument(skip(self, credentials), fields(portal = %portal, email = %credentials.email))]
    pub async fn login(
        &self,
        portal: AdminRole,
        credentials: &Credentials,
    ) -> Result<AdminSession, AuthError> {
        let path = match portal {
            AdminRole::GeneralAdmin => "/auth/admin/login",
            AdminRole::MultiVendorAdmin => "/auth/admin/multi-vendor-login",
        };
        let body = serde_json::json!({
            "email": credentials.email.as_str(),
            "password": credentials.password.expose_secret(),
        });

        let response: LoginResponse = match self.inner.api.post(path, &body).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized { message }) => {
                return Err(AuthError::InvalidCredentials { message });
            }
            Err(e) => return Err(e.into()),
        };

        let (token, profile) = match response {
            LoginResponse {
                success: true,
                token: Some(token),
                user: Some(profile),
                ..
            } => (token, profile),
            LoginResponse { message, .. } => {
                return Err(AuthError::InvalidCredentials {
                    message: message.unwrap_or_else(|| "Login failed".to_owned()),
                });
            }
        };

        // Install before fetching grants so the grants call is authenticated.
        let mut session = AdminSession::new(token, profile);
        self.install_session(session.clone()).await;

        if session.role() == AdminRole::MultiVendorAdmin {
            match self.inner.vendor_access.grants_for(&session.profile.email).await {
                Ok(grants) => {
                    session.vendor_grants = grants;
                    self.install_session(session.clone()).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to load vendor access grants; continuing with none");
                }
            }
        }

        Ok(session)
    }

    /// Log out.
    ///
    /// The server-side teardown is best-effort: a network failure is logged
    /// and swallowed, and local state is cleared unconditionally so an
    /// offline admin can always log out.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let result: Result<serde_json::Value, ApiError> = self
            .inner
            .api
            .post("/auth/logout", &serde_json::json!({}))
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "server-side logout failed; clearing local session anyway");
        }

        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear session store on logout");
        }
        *self.inner.state.write().await = AuthState::Unauthenticated;
    }

    /// Signal that an authenticated call was rejected with `401`.
    ///
    /// The HTTP adapter has already cleared the store by the time it
    /// returns [`ApiError::SessionExpired`]; this resets the in-memory
    /// state to match.
    pub async fn session_expired(&self) {
        *self.inner.state.write().await = AuthState::Unauthenticated;
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new general admin. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when the backend rejects the payload.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register_general(
        &self,
        registration: &GeneralRegistration,
    ) -> Result<String, AuthError> {
        let body = serde_json::json!({
            "name": registration.name,
            "email": registration.email.as_str(),
            "password": registration.password.expose_secret(),
        });
        let response: AckResponse = self.inner.api.post("/auth/admin/register", &body).await?;
        Self::ack_outcome(response, "Registration successful", "Registration failed")
    }

    /// Register a new multi-vendor admin using a vendor-issued access token.
    ///
    /// The token is verified first so a revoked invite fails before any
    /// account is created. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessTokenRejected`] when the access token is
    /// unknown or revoked, [`AuthError::Api`] for other failures.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register_multi_vendor(
        &self,
        registration: &MultiVendorRegistration,
    ) -> Result<String, AuthError> {
        if let Err(e) = self
            .inner
            .vendor_access
            .verify(&registration.access_token)
            .await
        {
            return Err(match e {
                ApiError::Api { message } => AuthError::AccessTokenRejected(message),
                other => other.into(),
            });
        }

        let body = serde_json::json!({
            "name": registration.name,
            "email": registration.email.as_str(),
            "password": registration.password.expose_secret(),
            "accessToken": registration.access_token,
        });
        let response: AckResponse = self
            .inner
            .api
            .post("/auth/admin/multi-vendor-register", &body)
            .await?;
        Self::ack_outcome(response, "Registration successful", "Registration failed")
    }

    /// Entry URL for the Google OAuth flow.
    #[must_use]
    pub fn google_login_url(&self) -> String {
        format!("{}/auth/google/admin", self.inner.api.base_url())
    }

    // =========================================================================
    // Password recovery
    // =========================================================================

    /// Request a password reset link for the given email. Safe to call
    /// repeatedly to resend the link.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when no account matches or the mail
    /// cannot be sent.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &Email) -> Result<String, AuthError> {
        let body = serde_json::json!({ "email": email.as_str() });
        let response: AckResponse = self
            .inner
            .api
            .post("/auth/admin/forgot-password", &body)
            .await?;
        Self::ack_outcome(
            response,
            "Password reset link sent",
            "Failed to send reset link",
        )
    }

    /// Set a new password using a reset token from the emailed link.
    ///
    /// The password is validated locally before any request is made. Does
    /// not log in; the admin signs in with the new password afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::WeakPassword`] when the new password fails the
    /// strength policy, [`AuthError::Api`] when the token is unknown or
    /// expired.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<String, AuthError> {
        let missing = Self::password_shortfalls(new_password.expose_secret());
        if !missing.is_empty() {
            return Err(AuthError::WeakPassword { missing });
        }

        let body = serde_json::json!({
            "token": token,
            "password": new_password.expose_secret(),
        });
        let response: AckResponse = self
            .inner
            .api
            .post("/auth/admin/reset-password", &body)
            .await?;
        Self::ack_outcome(
            response,
            "Password reset successfully",
            "Failed to reset password",
        )
    }

    /// The strength requirements the password fails to meet, empty when it
    /// passes.
    fn password_shortfalls(password: &str) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if password.chars().count() < 8 {
            missing.push("at least 8 characters");
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            missing.push("an uppercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            missing.push("a lowercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            missing.push("a number");
        }
        if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
            missing.push("a special character");
        }
        missing
    }

    // =========================================================================
    // Vendor access grants
    // =========================================================================

    /// Reload the authenticated multi-vendor admin's access grants.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] if no multi-vendor session is active or
    /// the grants cannot be fetched.
    pub async fn load_vendor_grants(&self) -> Result<AdminSession, AuthError> {
        let mut session = self.multi_vendor_session().await?;
        session.vendor_grants = self
            .inner
            .vendor_access
            .grants_for(&session.profile.email)
            .await?;
        self.install_session(session.clone()).await;
        Ok(session)
    }

    /// Accept a pending vendor access grant, then reload grants.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] if no multi-vendor session is active or
    /// the accept call fails.
    pub async fn accept_vendor_grant(
        &self,
        grant_id: &byteme_core::GrantId,
    ) -> Result<AdminSession, AuthError> {
        let session = self.multi_vendor_session().await?;
        self.inner
            .vendor_access
            .accept(grant_id, &session.profile.email)
            .await?;
        self.load_vendor_grants().await
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    /// Snapshot of the current state.
    pub async fn state(&self) -> AuthState {
        self.inner.state.read().await.clone()
    }

    /// Whether any admin is logged in.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.is_authenticated()
    }

    /// Whether the logged-in admin is a general admin.
    pub async fn is_general_admin(&self) -> bool {
        self.role().await == Some(AdminRole::GeneralAdmin)
    }

    /// Whether the logged-in admin is a multi-vendor admin.
    pub async fn is_multi_vendor_admin(&self) -> bool {
        self.role().await == Some(AdminRole::MultiVendorAdmin)
    }

    /// The current session, if authenticated.
    pub async fn current_session(&self) -> Option<AdminSession> {
        self.inner.state.read().await.session().cloned()
    }

    async fn role(&self) -> Option<AdminRole> {
        self.inner
            .state
            .read()
            .await
            .session()
            .map(AdminSession::role)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist and activate a session. A storage failure degrades to an
    /// in-memory-only session (no persistence across restarts) rather than
    /// failing the flow.
    async fn install_session(&self, session: AdminSession) {
        if let Err(e) = self.inner.store.save(&session) {
            tracing::warn!(error = %e, "failed to persist session; it will not survive a restart");
        }
        *self.inner.state.write().await = AuthState::Authenticated(session);
    }

    async fn multi_vendor_session(&self) -> Result<AdminSession, AuthError> {
        let session = self.current_session().await.ok_or_else(|| AuthError::Api(
            ApiError::Api {
                message: "not logged in".to_owned(),
            },
        ))?;
        if session.role() != AdminRole::MultiVendorAdmin {
            return Err(AuthError::Api(ApiError::Api {
                message: "vendor access grants require a multi-vendor admin session".to_owned(),
            }));
        }
        Ok(session)
    }

    fn ack_outcome(
        response: AckResponse,
        ok_fallback: &str,
        err_fallback: &str,
    ) -> Result<String, AuthError> {
        if response.success {
            Ok(response.message.unwrap_or_else(|| ok_fallback.to_owned()))
        } else {
            Err(AuthError::Api(ApiError::Api {
                message: response.message.unwrap_or_else(|| err_fallback.to_owned()),
            }))
        }
    }

    /// Rebuild the URL without the OAuth callback parameters, preserving
    /// everything else.
    fn strip_oauth_params(url: &Url) -> Url {
        let mut clean = url.clone();
        let remaining: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| {
                !matches!(key.as_ref(), PARAM_TOKEN | PARAM_GOOGLE_AUTH | PARAM_USER_DATA)
            })
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if remaining.is_empty() {
            clean.set_query(None);
        } else {
            clean
                .query_pairs_mut()
                .clear()
                .extend_pairs(remaining)
                .finish();
        }
        clean
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_oauth_params_removes_only_callback_keys() {
        let url = Url::parse(
            "http://localhost:5173/?token=T&googleAuth=true&userData=%7B%7D&tab=orders",
        )
        .unwrap();
        let clean = AuthController::strip_oauth_params(&url);
        assert_eq!(clean.as_str(), "http://localhost:5173/?tab=orders");
    }

    #[test]
    fn test_strip_oauth_params_drops_empty_query() {
        let url = Url::parse("http://localhost:5173/?token=T&googleAuth=1&userData=%7B%7D").unwrap();
        let clean = AuthController::strip_oauth_params(&url);
        assert_eq!(clean.as_str(), "http://localhost:5173/");
        assert!(clean.query().is_none());
    }

    #[test]
    fn test_auth_state_default_is_initializing() {
        assert!(matches!(AuthState::default(), AuthState::Initializing));
        assert!(!AuthState::default().is_authenticated());
    }

    #[test]
    fn test_password_shortfalls_accepts_strong_password() {
        assert!(AuthController::password_shortfalls("Kottu&Rice#7").is_empty());
    }

    #[test]
    fn test_password_shortfalls_names_each_missing_requirement() {
        assert_eq!(
            AuthController::password_shortfalls("short"),
            vec![
                "at least 8 characters",
                "an uppercase letter",
                "a number",
                "a special character",
            ]
        );
        assert_eq!(
            AuthController::password_shortfalls("alllowercase1!"),
            vec!["an uppercase letter"]
        );
    }

    #[test]
    fn test_login_response_tolerates_failure_shape() {
        let response: LoginResponse =
            serde_json::from_str("{\"success\": false, \"message\": \"Bad password\"}").unwrap();
        assert!(!response.success);
        assert!(response.token.is_none());
        assert_eq!(response.message.as_deref(), Some("Bad password"));
    }
}
