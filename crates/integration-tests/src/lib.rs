//! Integration test harness for the ByteMe admin console.
//!
//! Every test runs against an in-process [`MockBackend`]: an axum server
//! bound to an ephemeral localhost port that speaks the ByteMe backend's
//! wire protocol (flat login responses, `{success, data, message}`
//! envelopes, Mongo-style `_id` fields). Tests wire a real
//! [`ApiClient`]/[`AuthController`] stack at it through an in-memory
//! session store, so the full client path is exercised without a running
//! backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p byteme-integration-tests
//! ```

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use byteme_client::auth::{AuthController, Credentials};
use byteme_client::config::ClientConfig;
use byteme_client::http::ApiClient;
use byteme_client::session::{MemoryStorage, SessionStore};
use byteme_core::AdminRole;

// Fixture identities known to the mock backend.
pub const GENERAL_EMAIL: &str = "admin@byteme.lk";
pub const MV_EMAIL: &str = "mv@byteme.lk";
pub const PASSWORD: &str = "correct-horse-battery";
pub const GENERAL_TOKEN: &str = "tok-general-0001";
pub const MV_TOKEN: &str = "tok-mv-0001";
pub const GENERAL_ADMIN_ID: &str = "66f1a2b3c4d5e6f7a8b9c0d1";
pub const MV_ADMIN_ID: &str = "66f1a2b3c4d5e6f7a8b9c0d2";
/// Vendor-issued registration access token the backend accepts.
pub const INVITE_TOKEN: &str = "invite-kottu-2026";
/// Password reset token the backend accepts.
pub const RESET_TOKEN: &str = "reset-kottu-2026";
/// A grant that starts out pending.
pub const PENDING_GRANT_ID: &str = "grant-0001";
/// A grant that is already accepted.
pub const ACCEPTED_GRANT_ID: &str = "grant-0002";

/// One request as observed by the mock backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub bearer: Option<String>,
}

#[derive(Default)]
struct BackendState {
    requests: Mutex<Vec<SeenRequest>>,
    accepted_grants: Mutex<HashSet<String>>,
    fail_logout: AtomicBool,
}

/// In-process stand-in for the ByteMe backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<BackendState>,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend crashed");
        });

        Self { addr, state }
    }

    /// Base URL the client stack should be pointed at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Requests observed so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The requests that hit the given path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Make `POST /auth/logout` fail with a 500 from now on.
    pub fn fail_logout(&self) {
        self.state.fail_logout.store(true, Ordering::SeqCst);
    }
}

/// A full client stack wired at a fresh [`MockBackend`].
pub struct TestContext {
    pub backend: MockBackend,
    pub store: SessionStore,
    pub api: ApiClient,
    pub auth: AuthController,
}

impl TestContext {
    /// Spawn a backend and wire an unauthenticated client stack at it.
    pub async fn new() -> Self {
        let backend = MockBackend::spawn().await;
        let store = SessionStore::new(MemoryStorage::new());
        let ctx = Self::with_parts(backend, store).await;
        ctx.auth.initialize(None).await;
        ctx
    }

    /// Build a second stack over an existing backend and store, simulating
    /// a process restart that finds a persisted session.
    pub async fn with_parts(backend: MockBackend, store: SessionStore) -> Self {
        let config = ClientConfig::new(
            &backend.base_url(),
            std::env::temp_dir().join(format!("byteme-it-{}.json", uuid::Uuid::new_v4())),
        )
        .expect("mock backend URL is valid");
        let api = ApiClient::new(&config, store.clone());
        let auth = AuthController::new(api.clone(), store.clone());
        Self {
            backend,
            store,
            api,
            auth,
        }
    }

    /// Tear down the client stack and build a fresh one over the same
    /// backend and session store, as a process restart would.
    pub async fn restart(self) -> Self {
        let ctx = Self::with_parts(self.backend, self.store.clone()).await;
        ctx.auth.initialize(None).await;
        ctx
    }

    /// Log in as the general admin fixture.
    pub async fn login_general(&self) {
        self.auth
            .login(AdminRole::GeneralAdmin, &general_credentials())
            .await
            .expect("general admin login failed");
    }

    /// Log in as the multi-vendor admin fixture.
    pub async fn login_multi_vendor(&self) {
        self.auth
            .login(AdminRole::MultiVendorAdmin, &multi_vendor_credentials())
            .await
            .expect("multi-vendor admin login failed");
    }
}

/// Credentials for the general admin fixture.
#[must_use]
pub fn general_credentials() -> Credentials {
    Credentials {
        email: GENERAL_EMAIL.parse().expect("fixture email is valid"),
        password: PASSWORD.into(),
    }
}

/// Credentials for the multi-vendor admin fixture.
#[must_use]
pub fn multi_vendor_credentials() -> Credentials {
    Credentials {
        email: MV_EMAIL.parse().expect("fixture email is valid"),
        password: PASSWORD.into(),
    }
}

// ============================================================================
// Router
// ============================================================================

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/auth/admin/login", post(general_login))
        .route("/api/auth/admin/multi-vendor-login", post(multi_vendor_login))
        .route("/api/auth/admin/register", post(register))
        .route("/api/auth/admin/multi-vendor-register", post(register))
        .route("/api/auth/admin/forgot-password", post(forgot_password))
        .route("/api/auth/admin/reset-password", post(reset_password))
        .route("/api/auth/logout", post(logout))
        .route("/api/vendor-access/verify/{token}", get(verify_access))
        .route("/api/vendor-access/user/{email}", get(grants_for_user))
        .route("/api/vendor-access/{id}/accept", post(accept_grant))
        .route("/api/admin/dashboard-stats", get(dashboard_stats))
        .route("/api/admin/vendors", get(list_vendors))
        .route("/api/users", get(list_customers))
        .route("/api/admin/orders", get(list_orders))
        .route("/api/orders/{id}/status", put(update_order_status))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<BackendState>>,
    request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToOwned::to_owned);
    let seen = SeenRequest {
        path: request
            .uri()
            .path()
            .trim_start_matches("/api")
            .to_owned(),
        bearer,
    };
    state
        .requests
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(seen);
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Reject unless the request carries one of the two fixture tokens.
fn require_auth(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    match bearer_token(headers) {
        Some(GENERAL_TOKEN | MV_TOKEN) => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid or expired token"})),
        )),
    }
}

fn general_profile_json() -> Value {
    json!({
        "_id": GENERAL_ADMIN_ID,
        "name": "Platform Admin",
        "email": GENERAL_EMAIL,
        "role": "admin",
    })
}

fn multi_vendor_profile_json() -> Value {
    json!({
        "_id": MV_ADMIN_ID,
        "name": "MV Admin",
        "email": MV_EMAIL,
        "role": "multi_vendor_admin",
    })
}

// ============================================================================
// Auth handlers
// ============================================================================

async fn general_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    login_response(&body, GENERAL_EMAIL, GENERAL_TOKEN, general_profile_json())
}

async fn multi_vendor_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    login_response(&body, MV_EMAIL, MV_TOKEN, multi_vendor_profile_json())
}

fn login_response(
    body: &Value,
    expected_email: &str,
    token: &str,
    profile: Value,
) -> (StatusCode, Json<Value>) {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if email == Some(expected_email) && password == Some(PASSWORD) {
        (
            StatusCode::OK,
            Json(json!({"success": true, "token": token, "user": profile})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid email or password"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body.get("email").and_then(Value::as_str);
    if email == Some(GENERAL_EMAIL) || email == Some(MV_EMAIL) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "An admin with this email already exists"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "Registration successful"})),
    )
}

async fn forgot_password(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body.get("email").and_then(Value::as_str);
    if email == Some(GENERAL_EMAIL) || email == Some(MV_EMAIL) {
        (
            StatusCode::OK,
            Json(json!({"success": true, "message": "Password reset link sent to your email"})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "No admin account found with this email"})),
        )
    }
}

async fn reset_password(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("token").and_then(Value::as_str) != Some(RESET_TOKEN) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Invalid or expired reset token"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "Password reset successfully"})),
    )
}

async fn logout(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    if state.fail_logout.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "logout service unavailable"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

// ============================================================================
// Vendor access handlers
// ============================================================================

async fn verify_access(Path(token): Path<String>) -> (StatusCode, Json<Value>) {
    if token == INVITE_TOKEN {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "vendorId": "vendor-0001",
                    "vendorName": "Kottu Corner",
                    "accessType": "manage",
                },
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Invalid or revoked access token"})),
        )
    }
}

async fn grants_for_user(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    if email != MV_EMAIL {
        return (StatusCode::OK, Json(json!({"success": true, "data": []})));
    }
    let accepted = state
        .accepted_grants
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let pending_status = if accepted.contains(PENDING_GRANT_ID) {
        "accepted"
    } else {
        "pending"
    };
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [
                {
                    "_id": PENDING_GRANT_ID,
                    "vendorId": "vendor-0001",
                    "vendorName": "Kottu Corner",
                    "accessType": "manage",
                    "status": pending_status,
                },
                {
                    "_id": ACCEPTED_GRANT_ID,
                    "vendorId": "vendor-0002",
                    "vendorName": "Spice Hut",
                    "accessType": "view",
                    "status": "accepted",
                },
            ],
        })),
    )
}

async fn accept_grant(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    if id != PENDING_GRANT_ID && id != ACCEPTED_GRANT_ID {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Grant not found"})),
        );
    }
    state
        .accepted_grants
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .insert(id.clone());
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "_id": id,
                "vendorId": "vendor-0001",
                "vendorName": "Kottu Corner",
                "accessType": "manage",
                "status": "accepted",
            },
        })),
    )
}

// ============================================================================
// Data handlers
// ============================================================================

async fn dashboard_stats(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "totalVendors": 42,
                "totalCustomers": 1810,
                "totalOrders": 9021,
                "totalRevenue": 1_250_000.5,
                "growth": {"vendors": 4.2, "customers": 11.0, "orders": -1.5, "revenue": 7.75},
            },
        })),
    )
}

async fn list_vendors(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [
                {
                    "_id": "vendor-0001",
                    "name": "Kottu Corner",
                    "email": "kottu@byteme.lk",
                    "cuisine": "sri lankan",
                    "rating": 4.6,
                    "totalReviews": 128,
                },
                {
                    "_id": "vendor-0002",
                    "name": "Spice Hut",
                    "email": "spice@byteme.lk",
                },
            ],
        })),
    )
}

async fn list_customers(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [
                {
                    "_id": "customer-0001",
                    "firstName": "Nimal",
                    "lastName": "Perera",
                    "email": "nimal@example.com",
                    "isActive": true,
                    "isEmailVerified": true,
                    "createdAt": "2026-01-10T08:30:00Z",
                },
            ],
        })),
    )
}

async fn list_orders(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [
                {
                    "_id": "order-0001",
                    "status": "preparing",
                    "totalAmount": 3200.0,
                    "paymentStatus": "paid",
                    "items": [{"name": "Chicken Kottu", "quantity": 2, "price": 1600.0}],
                    "createdAt": "2026-02-01T12:00:00Z",
                },
            ],
        })),
    )
}

async fn update_order_status(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = require_auth(&headers) {
        return rejection;
    }
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "_id": id,
                "status": status,
                "totalAmount": 3200.0,
            },
        })),
    )
}
