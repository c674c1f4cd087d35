//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BYTEME_API_BASE_URL` - Base URL of the ByteMe backend API
//!   (default: `http://localhost:3000/api`)
//! - `BYTEME_SESSION_FILE` - Path of the persisted session record
//!   (default: `$HOME/.byteme/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend base URL for local development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// ByteMe console client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_base_url: String,
    /// Where the session record is persisted between runs.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `BYTEME_API_BASE_URL` is not
    /// a valid absolute URL, or [`ConfigError::MissingEnvVar`] if no session
    /// file path can be derived (no `BYTEME_SESSION_FILE` and no `HOME`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = match std::env::var("BYTEME_API_BASE_URL") {
            Ok(raw) => Self::validate_base_url(&raw)?,
            Err(_) => DEFAULT_API_BASE_URL.to_owned(),
        };

        let session_file = match std::env::var_os("BYTEME_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => {
                let home = std::env::var_os("HOME")
                    .ok_or_else(|| ConfigError::MissingEnvVar("BYTEME_SESSION_FILE".to_owned()))?;
                PathBuf::from(home).join(".byteme").join("session.json")
            }
        };

        Ok(Self {
            api_base_url,
            session_file,
        })
    }

    /// Build a configuration directly, normalizing the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `base_url` is not a valid
    /// absolute URL.
    pub fn new(base_url: &str, session_file: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: Self::validate_base_url(base_url)?,
            session_file,
        })
    }

    fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
        let url = Url::parse(raw).map_err(|e| {
            ConfigError::InvalidEnvVar("BYTEME_API_BASE_URL".to_owned(), e.to_string())
        })?;
        if !url.has_host() {
            return Err(ConfigError::InvalidEnvVar(
                "BYTEME_API_BASE_URL".to_owned(),
                "URL must have a host".to_owned(),
            ));
        }
        Ok(raw.trim_end_matches('/').to_owned())
    }
}
