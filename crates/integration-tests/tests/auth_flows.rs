//! Login, registration, logout and session persistence flows.

use byteme_client::auth::{Credentials, GeneralRegistration, MultiVendorRegistration};
use byteme_client::error::AuthError;
use byteme_client::session::{SessionStore, StorageBackend, StorageError};
use byteme_core::AdminRole;

use byteme_integration_tests::{
    GENERAL_ADMIN_ID, GENERAL_EMAIL, GENERAL_TOKEN, INVITE_TOKEN, MV_TOKEN, MockBackend, PASSWORD,
    TestContext, general_credentials,
};

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_general_admin_login_persists_session() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    assert!(ctx.auth.is_general_admin().await);
    assert!(!ctx.auth.is_multi_vendor_admin().await);

    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.token, GENERAL_TOKEN);
    assert_eq!(session.profile.email.as_str(), GENERAL_EMAIL);
    assert_eq!(session.admin_id().as_str(), GENERAL_ADMIN_ID);
    assert!(session.vendor_grants.is_empty());

    // The session is on disk (well, in the store), not just in memory.
    let stored = ctx.store.load().expect("store is empty");
    assert_eq!(stored, session);
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let ctx = TestContext::new().await;
    let credentials = Credentials {
        email: GENERAL_EMAIL.parse().expect("valid email"),
        password: "wrong".into(),
    };

    let result = ctx.auth.login(AdminRole::GeneralAdmin, &credentials).await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials { .. })));

    // A rejected login never touches state or store.
    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_multi_vendor_login_loads_grants() {
    let ctx = TestContext::new().await;
    ctx.login_multi_vendor().await;

    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.token, MV_TOKEN);
    assert_eq!(session.role(), AdminRole::MultiVendorAdmin);
    assert_eq!(session.vendor_grants.len(), 2);

    // The grants call was made with the fresh token. The email is
    // percent-encoded on the wire.
    let seen = ctx.backend.requests_to("/vendor-access/user/mv%40byteme.lk");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].bearer.as_deref(), Some(MV_TOKEN));
}

#[tokio::test]
async fn test_second_login_replaces_first_session() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;
    ctx.login_multi_vendor().await;

    // Only one session can exist; the later portal wins.
    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.role(), AdminRole::MultiVendorAdmin);
    let stored = ctx.store.load().expect("store is empty");
    assert_eq!(stored.token, MV_TOKEN);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let ctx = ctx.restart().await;
    assert!(ctx.auth.is_general_admin().await);
    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.token, GENERAL_TOKEN);
    assert_eq!(session.admin_id().as_str(), GENERAL_ADMIN_ID);
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_general_registration_does_not_log_in() {
    let ctx = TestContext::new().await;
    let registration = GeneralRegistration {
        name: "New Admin".to_owned(),
        email: "new-admin@byteme.lk".parse().expect("valid email"),
        password: PASSWORD.into(),
    };

    let message = ctx
        .auth
        .register_general(&registration)
        .await
        .expect("registration failed");
    assert_eq!(message, "Registration successful");

    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let ctx = TestContext::new().await;
    let registration = GeneralRegistration {
        name: "Platform Admin".to_owned(),
        email: GENERAL_EMAIL.parse().expect("valid email"),
        password: PASSWORD.into(),
    };

    let result = ctx.auth.register_general(&registration).await;
    assert!(matches!(result, Err(AuthError::Api(_))));
}

#[tokio::test]
async fn test_multi_vendor_registration_verifies_access_token() {
    let ctx = TestContext::new().await;

    let valid = MultiVendorRegistration {
        name: "Invited Admin".to_owned(),
        email: "invited@byteme.lk".parse().expect("valid email"),
        password: PASSWORD.into(),
        access_token: INVITE_TOKEN.to_owned(),
    };
    ctx.auth
        .register_multi_vendor(&valid)
        .await
        .expect("registration with a valid invite failed");

    let revoked = MultiVendorRegistration {
        access_token: "revoked-token".to_owned(),
        ..valid
    };
    let result = ctx.auth.register_multi_vendor(&revoked).await;
    assert!(matches!(result, Err(AuthError::AccessTokenRejected(_))));

    // The register endpoint was never hit for the revoked token.
    let registrations = ctx
        .backend
        .requests_to("/auth/admin/multi-vendor-register");
    assert_eq!(registrations.len(), 1);
}

// ============================================================================
// Degraded storage
// ============================================================================

/// Storage whose writes always fail, as a read-only home directory would.
struct ReadOnlyStorage;

impl StorageBackend for ReadOnlyStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&self, _raw: &str) -> Result<(), StorageError> {
        Err(std::io::Error::other("read-only medium").into())
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_survives_unwritable_session_storage() {
    let backend = MockBackend::spawn().await;
    let store = SessionStore::new(ReadOnlyStorage);
    let ctx = TestContext::with_parts(backend, store).await;
    ctx.auth.initialize(None).await;

    let session = ctx
        .auth
        .login(AdminRole::GeneralAdmin, &general_credentials())
        .await
        .expect("login failed");
    assert_eq!(session.token, GENERAL_TOKEN);

    // The session is live in memory but was never persisted.
    assert!(ctx.auth.is_general_admin().await);
    assert!(ctx.store.load().is_none());

    // So it does not survive a restart.
    let ctx = ctx.restart().await;
    assert!(!ctx.auth.is_authenticated().await);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    ctx.auth.logout().await;
    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;
    ctx.backend.fail_logout();

    ctx.auth.logout().await;
    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_login_after_logout_works() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;
    ctx.auth.logout().await;

    let session = ctx
        .auth
        .login(AdminRole::GeneralAdmin, &general_credentials())
        .await
        .expect("re-login failed");
    assert_eq!(session.token, GENERAL_TOKEN);
    assert!(ctx.auth.is_authenticated().await);
}
