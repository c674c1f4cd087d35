//! HTTP client adapter for the ByteMe backend.
//!
//! All backend traffic flows through [`ApiClient`], which attaches the
//! bearer token held by the session store and intercepts `401` responses:
//! any authenticated call that comes back unauthorized invalidates the
//! stored session and surfaces [`ApiError::SessionExpired`], which the
//! route guard turns into a redirect to the landing page. The login and
//! password-recovery endpoints are exempt, so a wrong password renders as a
//! form error rather than a surprise redirect.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Pre-auth paths whose `401` responses must not invalidate the stored
/// session: login and password recovery.
const LOGIN_PATHS: [&str; 4] = [
    "/auth/admin/login",
    "/auth/admin/multi-vendor-login",
    "/auth/admin/forgot-password",
    "/auth/admin/reset-password",
];

/// Generic backend response envelope: `{success, data?, message?}`.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Error body shape used by non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Shared HTTP client for the ByteMe backend.
///
/// Cheap to clone; all clones share one connection pool and one session
/// store. Requests are single fire-and-forget calls: no retries, no
/// queueing, no in-flight deduplication.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl ApiClient {
    /// Create a new client over the given session store.
    #[must_use]
    pub fn new(config: &ClientConfig, store: SessionStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                store,
            }),
        }
    }

    /// The backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The session store this client reads tokens from.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// `GET` a path and parse the response body directly as `T`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure taxonomy.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// `GET` a path and unwrap the `{success, data}` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the backend reports `success: false`.
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::unwrap_envelope(self.execute(Method::GET, path, None).await?)
    }

    /// `POST` a JSON body and parse the response directly as `T`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure taxonomy.
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// `POST` a JSON body and unwrap the `{success, data}` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the backend reports `success: false`.
    pub async fn post_data<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        Self::unwrap_envelope(self.post(path, body).await?)
    }

    /// `PUT` a JSON body and unwrap the `{success, data}` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the backend reports `success: false`.
    pub async fn put_data<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        Self::unwrap_envelope(self.execute(Method::PUT, path, Some(body)).await?)
    }

    /// `DELETE` a path, ignoring any response data.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure taxonomy.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Execute one request against `base_url + path`.
    ///
    /// The bearer token is resolved from the session store per request, so
    /// a session saved between calls takes effect immediately.
    #[instrument(skip(self, body), fields(method = %method, path))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.client.request(method, &url);
        if let Some(session) = self.inner.store.load() {
            request = request.bearer_auth(&session.token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(path, response).await);
        }

        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(ApiError::Api { message });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Map a `401` to the right error, invalidating the session unless the
    /// failing request was itself a login attempt.
    async fn handle_unauthorized(&self, path: &str, response: reqwest::Response) -> ApiError {
        let message = Self::error_message(response)
            .await
            .unwrap_or_else(|| "Invalid email or password".to_owned());

        if LOGIN_PATHS.iter().any(|login| path.starts_with(login)) {
            return ApiError::Unauthorized { message };
        }

        tracing::info!(path, "authenticated call returned 401; invalidating session");
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear session store after 401");
        }
        ApiError::SessionExpired
    }

    async fn error_message(response: reqwest::Response) -> Option<String> {
        let body = response.text().await.ok()?;
        serde_json::from_str::<ErrorBody>(&body).ok()?.message
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
        if !envelope.success {
            return Err(ApiError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_owned()),
            });
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Parse("missing data in successful response".to_owned()))
    }
}
