//! ByteMe admin console client.
//!
//! This crate is the authenticated core of the ByteMe admin console. It owns
//! the client-held session (who is logged in, with which role and bearer
//! token), the login/logout/OAuth flows, and the typed REST surface over the
//! external ByteMe backend. The view layer - currently the `byteme-cli`
//! console - is a pure consumer of these pieces.
//!
//! # Modules
//!
//! - [`session`] - The session record and its durable [`session::SessionStore`]
//! - [`auth`] - The [`auth::AuthController`] state machine and auth flows
//! - [`guard`] - Pure route-level access decisions
//! - [`http`] - The bearer-injecting, 401-intercepting [`http::ApiClient`]
//! - [`services`] - Typed wrappers for the backend's analytics and CRUD endpoints
//! - [`config`] - Environment-driven client configuration
//!
//! # Wiring
//!
//! ```rust,no_run
//! use byteme_client::config::ClientConfig;
//! use byteme_client::http::ApiClient;
//! use byteme_client::session::{SessionStore, FileStorage};
//! use byteme_client::auth::AuthController;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let store = SessionStore::new(FileStorage::new(config.session_file.clone()));
//! let api = ApiClient::new(&config, store.clone());
//! let auth = AuthController::new(api, store);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod services;
pub mod session;

pub use auth::{AuthController, AuthState, Credentials};
pub use error::{ApiError, AuthError};
pub use guard::{Route, RouteDecision};
pub use session::{AdminProfile, AdminSession, SessionStore, VendorAccessGrant};
