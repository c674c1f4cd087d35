//! Error types for the ByteMe client.

use thiserror::Error;

use crate::session::StorageError;

/// Errors surfaced by the [`ApiClient`](crate::http::ApiClient) and the
/// typed services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// A login attempt was rejected by the backend (bad credentials).
    ///
    /// This is recoverable locally: render it as a form error. It never
    /// touches stored session state.
    #[error("authentication failed: {message}")]
    Unauthorized {
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// An authenticated call came back `401`.
    ///
    /// Not locally recoverable: by the time this is returned the session
    /// store has already been cleared, and the caller must route the user
    /// back to the landing page.
    #[error("session expired")]
    SessionExpired,

    /// The backend answered with `success: false` or a non-auth error status.
    #[error("{message}")]
    Api {
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The session store could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the [`AuthController`](crate::auth::AuthController).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login rejected: wrong email or password, or a disabled account.
    #[error("{message}")]
    InvalidCredentials {
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// The vendor-issued access token was rejected during multi-vendor
    /// registration.
    #[error("vendor access token rejected: {0}")]
    AccessTokenRejected(String),

    /// A new password failed local strength validation; no request was made.
    #[error("password does not meet requirements: {}", missing.join(", "))]
    WeakPassword {
        /// The requirements the password falls short of.
        missing: Vec<&'static str>,
    },

    /// An underlying API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session store could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ApiError::Unauthorized {
            message: "Invalid email or password".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed: Invalid email or password"
        );

        let err = AuthError::InvalidCredentials {
            message: "Login failed".to_owned(),
        };
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_weak_password_lists_shortfalls() {
        let err = AuthError::WeakPassword {
            missing: vec!["at least 8 characters", "a number"],
        };
        assert_eq!(
            err.to_string(),
            "password does not meet requirements: at least 8 characters, a number"
        );
    }

    #[test]
    fn test_session_expired_is_terse() {
        assert_eq!(ApiError::SessionExpired.to_string(), "session expired");
    }
}
