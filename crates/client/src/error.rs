//! Request failure classification.
//!
//! Every way a pipeline invocation can fail maps onto exactly one [`ApiError`]
//! variant. The set is closed: endpoint wrappers and callers select from it,
//! they do not extend it.

use thiserror::Error;

use crate::response::{ApiResponse, ValidationErrors};

/// Errors produced by API requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not reach the host at all.
    #[error("Connection to the server could not be established")]
    NoConnection,

    /// A failure in the HTTP layer other than an unreachable host: an I/O
    /// error on an established connection, or the client could not be
    /// constructed in the first place.
    #[error("HTTP transport error")]
    Transport(#[source] reqwest::Error),

    /// The server rejected the bearer token (or its absence).
    #[error("Unauthenticated")]
    Unauthenticated(ApiResponse),

    /// The bearer token is valid but lacks a required scope.
    #[error("Missing scope permissions")]
    InvalidScopes(ApiResponse),

    /// The response did not have the status or shape the caller expected.
    #[error("Unable to evaluate response")]
    ResponseEvaluation(ApiResponse),

    /// The server reported per-field validation errors.
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// A response body could not be deserialized into the requested type.
    #[error("Malformed response payload")]
    Deserialize(#[from] serde_json::Error),

    /// Host and path did not combine into a valid request URL.
    #[error("Invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The envelope that triggered this error, for the variants that carry one.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Unauthenticated(response)
            | Self::InvalidScopes(response)
            | Self::ResponseEvaluation(response) => Some(response),
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carried_envelope_is_accessible() {
        let response = ApiResponse::new(401, None, None);
        let err = ApiError::Unauthenticated(response);
        assert_eq!(err.response().unwrap().status(), 401);

        assert!(ApiError::NoConnection.response().is_none());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ApiError::NoConnection.to_string(),
            "Connection to the server could not be established"
        );
        assert_eq!(
            ApiError::InvalidScopes(ApiResponse::new(403, None, None)).to_string(),
            "Missing scope permissions"
        );
    }
}
