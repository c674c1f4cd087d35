//! Forgot-password and reset-password flows.

use byteme_client::error::AuthError;
use byteme_core::Email;

use byteme_integration_tests::{GENERAL_EMAIL, RESET_TOKEN, TestContext};

const STRONG_PASSWORD: &str = "Kottu&Rice#7";

fn general_email() -> Email {
    GENERAL_EMAIL.parse().expect("fixture email is valid")
}

// ============================================================================
// Forgot password
// ============================================================================

#[tokio::test]
async fn test_forgot_password_sends_reset_link() {
    let ctx = TestContext::new().await;

    let message = ctx
        .auth
        .forgot_password(&general_email())
        .await
        .expect("forgot password failed");
    assert_eq!(message, "Password reset link sent to your email");

    // A pre-auth request: no bearer token attached.
    let seen = ctx.backend.requests_to("/auth/admin/forgot-password");
    assert_eq!(seen.len(), 1);
    assert!(seen[0].bearer.is_none());
}

#[tokio::test]
async fn test_forgot_password_resend_is_allowed() {
    let ctx = TestContext::new().await;

    ctx.auth
        .forgot_password(&general_email())
        .await
        .expect("first request failed");
    ctx.auth
        .forgot_password(&general_email())
        .await
        .expect("resend failed");

    let seen = ctx.backend.requests_to("/auth/admin/forgot-password");
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn test_forgot_password_unknown_email_is_an_api_error() {
    let ctx = TestContext::new().await;
    let email: Email = "nobody@byteme.lk".parse().expect("valid email");

    let result = ctx.auth.forgot_password(&email).await;
    match result {
        Err(AuthError::Api(e)) => {
            assert_eq!(e.to_string(), "No admin account found with this email");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

// ============================================================================
// Reset password
// ============================================================================

#[tokio::test]
async fn test_reset_password_with_valid_token_succeeds() {
    let ctx = TestContext::new().await;

    let message = ctx
        .auth
        .reset_password(RESET_TOKEN, &STRONG_PASSWORD.into())
        .await
        .expect("reset failed");
    assert_eq!(message, "Password reset successfully");

    // Resetting a password never starts a session.
    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_reset_password_rejects_weak_password_locally() {
    let ctx = TestContext::new().await;

    let result = ctx
        .auth
        .reset_password(RESET_TOKEN, &"feeble".into())
        .await;
    assert!(matches!(result, Err(AuthError::WeakPassword { .. })));

    // Validation happens before any request is made.
    assert!(ctx.backend.requests_to("/auth/admin/reset-password").is_empty());
}

#[tokio::test]
async fn test_reset_password_with_expired_token_is_an_api_error() {
    let ctx = TestContext::new().await;

    let result = ctx
        .auth
        .reset_password("reset-expired-0000", &STRONG_PASSWORD.into())
        .await;
    match result {
        Err(AuthError::Api(e)) => {
            assert_eq!(e.to_string(), "Invalid or expired reset token");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_reset_password_leaves_existing_session_alone() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    ctx.auth
        .reset_password(RESET_TOKEN, &STRONG_PASSWORD.into())
        .await
        .expect("reset failed");

    // Recovering a password from a logged-in console does not log out.
    assert!(ctx.auth.is_general_admin().await);
    assert!(ctx.store.load().is_some());
}
