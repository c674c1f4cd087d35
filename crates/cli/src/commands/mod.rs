//! Command implementations, one module per console area.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod grants;
pub mod orders;
pub mod vendors;

use thiserror::Error;

use byteme_client::auth::AuthController;
use byteme_client::config::ClientConfig;
use byteme_client::http::ApiClient;
use byteme_client::session::{FileStorage, SessionStore};

/// Errors shared by all commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Client configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] byteme_client::config::ConfigError),

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] byteme_client::ApiError),

    /// An authentication flow failed.
    #[error(transparent)]
    Auth(#[from] byteme_client::AuthError),

    /// A command-line argument did not parse.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The command requires a logged-in admin.
    #[error("Not logged in. Run `byteme login` first.")]
    NotLoggedIn,
}

/// Wired-up client stack for one command invocation.
pub struct Context {
    pub api: ApiClient,
    pub auth: AuthController,
}

impl Context {
    /// Build the client stack from the environment and resolve the stored
    /// session.
    pub async fn load() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();

        let config = ClientConfig::from_env()?;
        let store = SessionStore::new(FileStorage::new(config.session_file.clone()));
        let api = ApiClient::new(&config, store.clone());
        let auth = AuthController::new(api.clone(), store);
        auth.initialize(None).await;
        Ok(Self { api, auth })
    }

    /// Like [`Context::load`], but fails unless an admin is logged in.
    pub async fn load_authenticated() -> Result<Self, CliError> {
        let ctx = Self::load().await?;
        if !ctx.auth.is_authenticated().await {
            return Err(CliError::NotLoggedIn);
        }
        Ok(ctx)
    }
}
