//! Authenticated access contexts.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::access::{ApiAccess, ApiAccessBuilder, Method};
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;

/// An [`ApiAccess`] that carries a bearer token.
///
/// Offers one extra capability: probing whether the token is currently
/// accepted by the server.
#[derive(Debug, Clone)]
pub struct AuthApiAccess {
    access: ApiAccess,
}

impl AuthApiAccess {
    /// Create an authenticated context against the production host.
    ///
    /// The token is not validated here; use [`check`](Self::check) or
    /// [`ApiAccess::login`] for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(token, ApiAccess::builder())
    }

    /// Create an authenticated context from a pre-configured builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_config(token: impl Into<String>, builder: ApiAccessBuilder) -> Result<Self> {
        Ok(Self { access: builder.token(token).build()? })
    }

    /// The underlying access context.
    pub fn access(&self) -> &ApiAccess {
        &self.access
    }

    /// Probe whether the bearer token is currently valid.
    ///
    /// Issues a lightweight authenticated GET. `Some(true)` for a 200,
    /// `Some(false)` for any other completed response, and `None` when the
    /// host was unreachable — validity is then unknown, never `false`.
    ///
    /// # Errors
    ///
    /// Returns transport errors other than connect failures.
    pub async fn is_access_token_valid(&self) -> Result<Option<bool>> {
        Ok(self.probe().await?.map(|response| response.status() == 200))
    }

    /// Validate the token and hand the context back only if it is accepted.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoConnection`] when validity could not be determined,
    /// [`ApiError::Unauthenticated`] carrying the probe envelope when the
    /// server rejected the token.
    pub async fn check(self) -> Result<Self> {
        match self.probe().await? {
            None => Err(ApiError::NoConnection),
            Some(response) if response.status() == 200 => Ok(self),
            Some(response) => {
                debug!(status = response.status(), "access token rejected");
                Err(ApiError::Unauthenticated(response))
            }
        }
    }

    /// Probe the token endpoint; `None` means the host was unreachable.
    ///
    /// Auth rejections raised by the pipeline are folded back into their
    /// envelope so the probe can observe the status itself.
    async fn probe(&self) -> Result<Option<ApiResponse>> {
        match self.access.get("api/auth").await {
            Ok(response) if response.is_no_connection() => Ok(None),
            Ok(response) => Ok(Some(response)),
            Err(ApiError::NoConnection) => Ok(None),
            Err(ApiError::Unauthenticated(response) | ApiError::InvalidScopes(response)) => {
                Ok(Some(response))
            }
            Err(err) => Err(err),
        }
    }

    /// Send a GET request with this context's token.
    ///
    /// # Errors
    ///
    /// See [`ApiAccess::send`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.access.get(path).await
    }

    /// Send a POST request with this context's token.
    ///
    /// # Errors
    ///
    /// See [`ApiAccess::send`].
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        self.access.post(path, body).await
    }

    /// Execute one request off the calling task; see [`ApiAccess::dispatch`].
    pub fn dispatch(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> JoinHandle<Result<ApiResponse>> {
        self.access.dispatch(path, method, body)
    }
}

impl From<AuthApiAccess> for ApiAccess {
    fn from(auth: AuthApiAccess) -> Self {
        auth.access
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn auth_for(server: &MockServer, token: &str) -> AuthApiAccess {
        AuthApiAccess::with_config(token, ApiAccess::builder().host(server.uri()))
            .expect("auth access")
    }

    #[tokio::test]
    async fn valid_token_probes_true() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth"))
            .and(header("Authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let valid = auth_for(&server, "good").is_access_token_valid().await.expect("probe");
        assert_eq!(valid, Some(true));
    }

    #[tokio::test]
    async fn rejected_token_probes_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"message":"Unauthenticated."}"#),
            )
            .mount(&server)
            .await;

        let valid = auth_for(&server, "bad").is_access_token_valid().await.expect("probe");
        assert_eq!(valid, Some(false));
    }

    #[tokio::test]
    async fn unreachable_host_probes_unknown_never_false() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let auth = AuthApiAccess::with_config(
            "whatever",
            ApiAccess::builder().host(format!("http://{addr}")),
        )
        .expect("auth access");

        let valid = auth.is_access_token_valid().await.expect("probe");
        assert_eq!(valid, None);
    }

    #[tokio::test]
    async fn check_returns_context_for_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let auth = auth_for(&server, "good").check().await.expect("valid context");
        assert_eq!(auth.access().host(), server.uri());
    }

    #[tokio::test]
    async fn check_fails_with_unauthenticated_for_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"message":"Unauthenticated."}"#),
            )
            .mount(&server)
            .await;

        let result = auth_for(&server, "bad").check().await;
        match result {
            Err(ApiError::Unauthenticated(response)) => assert_eq!(response.status(), 401),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_fails_with_no_connection_when_unknown() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let auth = AuthApiAccess::with_config(
            "whatever",
            ApiAccess::builder().host(format!("http://{addr}")),
        )
        .expect("auth access");

        let result = auth.check().await;
        assert!(matches!(result, Err(ApiError::NoConnection)));
    }
}
