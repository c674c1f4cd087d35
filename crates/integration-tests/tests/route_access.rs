//! Route guard decisions over real authentication state.

use byteme_client::guard::{Route, RouteDecision, evaluate};
use byteme_client::session::{MemoryStorage, SessionStore};
use byteme_core::AdminId;

use byteme_integration_tests::{GENERAL_ADMIN_ID, MV_ADMIN_ID, MockBackend, TestContext};

#[tokio::test]
async fn test_guard_is_pending_until_initialized() {
    let backend = MockBackend::spawn().await;
    let ctx = TestContext::with_parts(backend, SessionStore::new(MemoryStorage::new())).await;

    // No initialize() yet: the guard must not redirect.
    let state = ctx.auth.state().await;
    assert_eq!(evaluate(&state, &Route::Dashboard), RouteDecision::Pending);

    ctx.auth.initialize(None).await;
    let state = ctx.auth.state().await;
    assert_eq!(
        evaluate(&state, &Route::Dashboard),
        RouteDecision::Redirect {
            to: Route::Landing,
            then: Some(Route::Dashboard),
        }
    );
}

#[tokio::test]
async fn test_unauthenticated_entry_surfaces_render() {
    let ctx = TestContext::new().await;
    let state = ctx.auth.state().await;

    for route in [
        Route::Landing,
        Route::GeneralAdminLogin,
        Route::MultiVendorAdminLogin,
        Route::ForgotPassword,
    ] {
        assert_eq!(evaluate(&state, &route), RouteDecision::Allow);
    }
}

#[tokio::test]
async fn test_general_admin_routes_after_login() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;
    let state = ctx.auth.state().await;

    // Entry surfaces bounce home.
    assert_eq!(
        evaluate(&state, &Route::Landing),
        RouteDecision::Redirect {
            to: Route::Dashboard,
            then: None,
        }
    );

    // Shared surfaces render.
    for route in [Route::Dashboard, Route::Vendors, Route::Orders] {
        assert_eq!(evaluate(&state, &route), RouteDecision::Allow);
    }

    // The multi-vendor view is off-limits, even with their own ID.
    let route = Route::MultiVendorDashboard(AdminId::from(GENERAL_ADMIN_ID));
    assert_eq!(
        evaluate(&state, &route),
        RouteDecision::Redirect {
            to: Route::Dashboard,
            then: None,
        }
    );
}

#[tokio::test]
async fn test_multi_vendor_admin_is_scoped_to_own_view() {
    let ctx = TestContext::new().await;
    ctx.login_multi_vendor().await;
    let state = ctx.auth.state().await;

    let own = Route::MultiVendorDashboard(AdminId::from(MV_ADMIN_ID));
    assert_eq!(evaluate(&state, &own), RouteDecision::Allow);

    // A foreign admin ID in the path redirects to their own view.
    let foreign = Route::MultiVendorDashboard(AdminId::from(GENERAL_ADMIN_ID));
    assert_eq!(
        evaluate(&state, &foreign),
        RouteDecision::Redirect {
            to: own.clone(),
            then: None,
        }
    );

    // Entry surfaces bounce to their own view too.
    assert_eq!(
        evaluate(&state, &Route::MultiVendorAdminLogin),
        RouteDecision::Redirect {
            to: own,
            then: None,
        }
    );
}

#[tokio::test]
async fn test_logout_locks_protected_routes_again() {
    let ctx = TestContext::new().await;
    ctx.login_general().await;
    ctx.auth.logout().await;
    let state = ctx.auth.state().await;

    assert_eq!(
        evaluate(&state, &Route::Settings),
        RouteDecision::Redirect {
            to: Route::Landing,
            then: Some(Route::Settings),
        }
    );
}
