//! Typed REST services against the mock backend.

use byteme_client::services::{
    AnalyticsService, CustomerService, OrderService, VendorAccessService, VendorService,
};
use byteme_client::session::GrantStatus;
use byteme_core::OrderId;

use byteme_integration_tests::{ACCEPTED_GRANT_ID, INVITE_TOKEN, PENDING_GRANT_ID, TestContext};

#[tokio::test]
async fn test_dashboard_stats_parse() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let stats = AnalyticsService::new(ctx.api.clone())
        .dashboard_stats()
        .await
        .expect("stats failed");
    assert_eq!(stats.total_vendors, 42);
    assert_eq!(stats.total_customers, 1810);
    assert_eq!(stats.total_orders, 9021);
    assert!((stats.total_revenue - 1_250_000.5).abs() < f64::EPSILON);
    assert_eq!(stats.growth.vendors, Some(4.2));
    assert_eq!(stats.growth.orders, Some(-1.5));
}

#[tokio::test]
async fn test_vendor_listing_tolerates_sparse_records() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let vendors = VendorService::new(ctx.api.clone())
        .list()
        .await
        .expect("vendor listing failed");
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0].name, "Kottu Corner");
    assert_eq!(vendors[0].rating, Some(4.6));
    // The second record has no optional fields set.
    assert!(vendors[1].cuisine.is_none());
    assert_eq!(vendors[1].total_reviews, 0);
}

#[tokio::test]
async fn test_customer_listing_parses_timestamps() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let customers = CustomerService::new(ctx.api.clone())
        .list()
        .await
        .expect("customer listing failed");
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].first_name, "Nimal");
    assert!(customers[0].is_active);
    assert!(customers[0].created_at.is_some());
    assert!(customers[0].last_login.is_none());
}

#[tokio::test]
async fn test_order_status_update_round_trip() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;

    let orders = OrderService::new(ctx.api.clone());
    let listing = orders.list(None, None).await.expect("order listing failed");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].status, "preparing");
    assert_eq!(listing[0].items.len(), 1);

    let updated = orders
        .update_status(&OrderId::from("order-0001"), "ready")
        .await
        .expect("status update failed");
    assert_eq!(updated.status, "ready");
}

#[tokio::test]
async fn test_access_token_verification() {
    let ctx = TestContext::new().await;
    let access = VendorAccessService::new(ctx.api.clone())
        .verify(INVITE_TOKEN)
        .await
        .expect("verify failed");
    assert_eq!(access.vendor_name, "Kottu Corner");
    assert_eq!(access.access_type, "manage");

    assert!(
        VendorAccessService::new(ctx.api.clone())
            .verify("bogus")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_grant_accept_flow() {
    let ctx = TestContext::new().await;
    ctx.login_multi_vendor().await;

    let session = ctx.auth.current_session().await.expect("session missing");
    let pending = session
        .vendor_grants
        .iter()
        .find(|g| g.id.as_str() == PENDING_GRANT_ID)
        .expect("pending grant missing");
    assert_eq!(pending.status, GrantStatus::Pending);

    let session = ctx
        .auth
        .accept_vendor_grant(&pending.id.clone())
        .await
        .expect("accept failed");

    // Both grants are now accepted and the refreshed list is persisted.
    for id in [PENDING_GRANT_ID, ACCEPTED_GRANT_ID] {
        let grant = session
            .vendor_grants
            .iter()
            .find(|g| g.id.as_str() == id)
            .expect("grant missing after accept");
        assert_eq!(grant.status, GrantStatus::Accepted);
    }
    let stored = ctx.store.load().expect("store is empty");
    assert_eq!(stored.vendor_grants, session.vendor_grants);
}
