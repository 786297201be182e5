//! The access context and the request execution pipeline.
//!
//! An [`ApiAccess`] bundles everything one request needs: the target host, an
//! optional bearer token, the failure policy, and the executor requests are
//! dispatched on. The context is immutable after construction and cheap to
//! clone; concurrent requests share it read-only.

use reqwest::header;
pub use reqwest::Method;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::auth::AuthApiAccess;
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;

/// The production API host.
pub const DEFAULT_HOST: &str = "https://lclpnet.work";

/// Configuration and credential bundle for API requests.
#[derive(Clone)]
pub struct ApiAccess {
    host: String,
    token: Option<String>,
    raise_connection_errors: bool,
    raise_auth_errors: bool,
    runtime: Option<Handle>,
    http: reqwest::Client,
}

impl ApiAccess {
    /// Start building an access context.
    pub fn builder() -> ApiAccessBuilder {
        ApiAccessBuilder::default()
    }

    /// An anonymous context against the production host with default policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn public() -> Result<Self> {
        Self::builder().build()
    }

    /// Log in with an OAuth access token.
    ///
    /// Probes the token against the production host and resolves with a
    /// ready-to-use [`AuthApiAccess`] only if it is valid.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoConnection`] if the host is unreachable (token validity
    /// unknown), [`ApiError::Unauthenticated`] if the token is invalid.
    pub async fn login(token: impl Into<String>) -> Result<AuthApiAccess> {
        AuthApiAccess::new(token)?.check().await
    }

    /// The host API requests are sent to, without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The bearer token, if this context is authenticated.
    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether unreachable-host failures are raised as errors.
    pub fn raises_connection_errors(&self) -> bool {
        self.raise_connection_errors
    }

    /// Whether 401/403 classifications are raised as errors.
    pub fn raises_auth_errors(&self) -> bool {
        self.raise_auth_errors
    }

    /// Send a GET request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(path, Method::GET, None).await
    }

    /// Send a POST request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        self.send(path, Method::POST, body).await
    }

    /// Execute one API request on the calling task.
    ///
    /// `path` is joined onto the host with a single `/` (no leading slash
    /// expected, e.g. `api/auth/user`). A `Some` body is serialized to UTF-8
    /// and sent; `None` sends no body at all. The fixed headers and, when
    /// present, the bearer token are attached to every request. The
    /// connection is owned by this invocation and released on every exit
    /// path once the response has been read.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidUrl`] when host and path do not form a URL.
    /// - [`ApiError::NoConnection`] when the host is unreachable — unless the
    ///   context downgrades connection errors, in which case the
    ///   no-connection sentinel envelope is returned instead.
    /// - [`ApiError::Transport`] for any other I/O failure.
    /// - [`ApiError::Unauthenticated`] / [`ApiError::InvalidScopes`] when the
    ///   server classifies the request that way and the context raises auth
    ///   errors.
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let raw_url = format!("{}/{}", self.host, path);
        let url = reqwest::Url::parse(&raw_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{raw_url}: {err}")))?;

        debug!(%method, %url, "sending api request");

        let mut request = self
            .http
            .request(method, url.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Requested-With", "XMLHttpRequest");

        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let raw = match request.send().await {
            Ok(raw) => raw,
            Err(err) if err.is_connect() => {
                debug!(%url, "connection could not be established");
                if self.raise_connection_errors {
                    return Err(ApiError::NoConnection);
                }
                return Ok(ApiResponse::no_connection());
            }
            Err(err) => return Err(ApiError::Transport(err)),
        };

        let response = ApiResponse::from_response(raw).await;
        debug!(status = response.status(), %url, "received api response");

        if self.raise_auth_errors {
            if response.is_unauthenticated() {
                return Err(ApiError::Unauthenticated(response));
            }
            if response.has_invalid_scopes() {
                return Err(ApiError::InvalidScopes(response));
            }
        }

        Ok(response)
    }

    /// Execute one API request off the calling task.
    ///
    /// The work is submitted to the context's runtime handle, or to the
    /// ambient tokio runtime when none was configured. The returned handle
    /// resolves on whichever worker completes the request; callers must not
    /// assume it resolves on their original task.
    ///
    /// # Panics
    ///
    /// Panics if no runtime handle is configured and the caller is outside a
    /// tokio runtime.
    pub fn dispatch(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> JoinHandle<Result<ApiResponse>> {
        let access = self.clone();
        let path = path.to_owned();
        let work = async move { access.send(&path, method, body).await };

        match &self.runtime {
            Some(handle) => handle.spawn(work),
            None => tokio::spawn(work),
        }
    }
}

impl std::fmt::Debug for ApiAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAccess")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("raise_connection_errors", &self.raise_connection_errors)
            .field("raise_auth_errors", &self.raise_auth_errors)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiAccess`].
#[derive(Debug)]
pub struct ApiAccessBuilder {
    host: String,
    token: Option<String>,
    raise_connection_errors: bool,
    raise_auth_errors: bool,
    runtime: Option<Handle>,
    timeout: Option<std::time::Duration>,
}

impl Default for ApiAccessBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            token: None,
            raise_connection_errors: true,
            raise_auth_errors: true,
            runtime: None,
            timeout: None,
        }
    }
}

impl ApiAccessBuilder {
    /// Target host, including the protocol and without a trailing slash.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Bearer token for authenticated requests.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Legacy opt-out: resolve unreachable-host failures with the
    /// no-connection sentinel envelope instead of an error.
    pub fn raise_connection_errors(mut self, raise: bool) -> Self {
        self.raise_connection_errors = raise;
        self
    }

    /// Legacy opt-out: pass 401/403 envelopes through as ordinary results
    /// instead of raising them.
    pub fn raise_auth_errors(mut self, raise: bool) -> Self {
        self.raise_auth_errors = raise;
        self
    }

    /// Runtime handle that dispatched requests are submitted to. Without one,
    /// [`ApiAccess::dispatch`] uses the ambient tokio runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Optional per-request timeout. The core protocol has no timeout; this
    /// is an extension for callers that want one.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the access context.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ApiAccess> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(ApiError::Transport)?;

        Ok(ApiAccess {
            host: self.host,
            token: self.token,
            raise_connection_errors: self.raise_connection_errors,
            raise_auth_errors: self.raise_auth_errors,
            runtime: self.runtime,
            http,
        })
    }
}
