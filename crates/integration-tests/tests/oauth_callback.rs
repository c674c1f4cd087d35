//! Google OAuth callback ingestion.

use url::Url;

use byteme_core::AdminRole;

use byteme_integration_tests::{MV_ADMIN_ID, MV_TOKEN, TestContext};

fn mv_profile_json() -> String {
    serde_json::json!({
        "_id": MV_ADMIN_ID,
        "name": "MV Admin",
        "email": "mv@byteme.lk",
        "role": "multi_vendor_admin",
    })
    .to_string()
}

fn callback_url(token: &str, user_data: &str) -> Url {
    Url::parse_with_params(
        "http://localhost:5173/",
        &[
            ("token", token),
            ("googleAuth", "true"),
            ("userData", user_data),
        ],
    )
    .expect("fixture URL is valid")
}

#[tokio::test]
async fn test_google_login_url_points_at_backend() {
    let ctx = TestContext::new().await;

    let entry = ctx.auth.google_login_url();
    assert_eq!(entry, format!("{}/auth/google/admin", ctx.backend.base_url()));

    // The flow entry point is a plain navigable URL.
    assert!(Url::parse(&entry).is_ok());
}

#[tokio::test]
async fn test_callback_on_startup_authenticates() {
    let ctx = TestContext::new().await;
    let url = callback_url(MV_TOKEN, &mv_profile_json());

    let clean = ctx
        .auth
        .initialize(Some(&url))
        .await
        .expect("callback was not ingested");

    // All three OAuth parameters are stripped from the continuation URL.
    assert_eq!(clean.as_str(), "http://localhost:5173/");

    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.token, MV_TOKEN);
    assert_eq!(session.role(), AdminRole::MultiVendorAdmin);
    assert_eq!(session.admin_id().as_str(), MV_ADMIN_ID);

    // And it is persisted like any password login.
    assert_eq!(ctx.store.load().expect("store is empty").token, MV_TOKEN);
}

#[tokio::test]
async fn test_incomplete_callback_is_ignored() {
    let ctx = TestContext::new().await;

    // Missing userData: not a callback at all.
    let url = Url::parse_with_params(
        "http://localhost:5173/",
        &[("token", MV_TOKEN), ("googleAuth", "true")],
    )
    .expect("fixture URL is valid");

    assert!(ctx.auth.ingest_oauth_callback(&url).await.is_none());
    assert!(!ctx.auth.is_authenticated().await);
    assert!(ctx.store.load().is_none());
}

#[tokio::test]
async fn test_malformed_user_data_leaves_state_untouched() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let url = callback_url(MV_TOKEN, "{not json");
    assert!(ctx.auth.ingest_oauth_callback(&url).await.is_none());

    // The prior session is still active.
    assert!(ctx.auth.is_general_admin().await);
}

#[tokio::test]
async fn test_callback_replaces_stored_session() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let url = callback_url(MV_TOKEN, &mv_profile_json());
    ctx.auth
        .ingest_oauth_callback(&url)
        .await
        .expect("callback was not ingested");

    let session = ctx.auth.current_session().await.expect("session missing");
    assert_eq!(session.role(), AdminRole::MultiVendorAdmin);
    assert_eq!(ctx.store.load().expect("store is empty").token, MV_TOKEN);
}

#[tokio::test]
async fn test_callback_preserves_unrelated_query_params() {
    let ctx = TestContext::new().await;
    let url = Url::parse_with_params(
        "http://localhost:5173/",
        &[
            ("tab", "orders"),
            ("token", MV_TOKEN),
            ("googleAuth", "true"),
            ("userData", mv_profile_json().as_str()),
        ],
    )
    .expect("fixture URL is valid");

    let clean = ctx
        .auth
        .ingest_oauth_callback(&url)
        .await
        .expect("callback was not ingested");
    assert_eq!(clean.as_str(), "http://localhost:5173/?tab=orders");
}
