//! The response envelope.
//!
//! An [`ApiResponse`] records one completed (or never-connected) transport
//! attempt: the HTTP status plus the raw success and error bodies. Everything
//! derived from it — status message, auth classification, validation errors —
//! is computed lazily and cached on first access.

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Byte-exact error body the server sends for a missing or invalid token.
/// This is a contract with the server; do not normalize it.
const UNAUTHENTICATED_BODY: &str = r#"{"message":"Unauthenticated."}"#;

/// Exact `message` text the server sends when a token lacks a scope.
const INVALID_SCOPES_MESSAGE: &str = "Invalid scope(s) provided.";

/// Immutable record of one HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    raw_body: Option<String>,
    raw_error: Option<String>,
    no_connection: bool,
    status_message: OnceCell<Option<String>>,
    validation_errors: OnceCell<Option<ValidationErrors>>,
}

impl ApiResponse {
    /// Create an envelope from already-read status and bodies.
    pub fn new(status: u16, raw_body: Option<String>, raw_error: Option<String>) -> Self {
        Self {
            status,
            raw_body,
            raw_error,
            no_connection: false,
            status_message: OnceCell::new(),
            validation_errors: OnceCell::new(),
        }
    }

    /// The sentinel envelope standing in for "transport never connected".
    ///
    /// It has status 0 and no bodies, and [`is_no_connection`](Self::is_no_connection)
    /// distinguishes it from any envelope built by [`new`](Self::new).
    pub fn no_connection() -> Self {
        Self { no_connection: true, ..Self::new(0, None, None) }
    }

    /// Read status and body out of a completed transport exchange.
    ///
    /// Statuses below 400 fill the success body, 400 and above fill the error
    /// body. A body that cannot be read is recorded as absent; that alone is
    /// never an error.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = response.text().await.ok();
        if status < 400 {
            Self::new(status, text, None)
        } else {
            Self::new(status, None, text)
        }
    }

    /// The HTTP status code; 0 for the no-connection sentinel.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The raw success body, if the server sent one.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    /// The raw error body, if the server sent one.
    pub fn raw_error(&self) -> Option<&str> {
        self.raw_error.as_deref()
    }

    /// Whether this envelope is the no-connection sentinel.
    pub fn is_no_connection(&self) -> bool {
        self.no_connection
    }

    /// The `message` field of whichever body is present, error body first.
    ///
    /// Returns `None` for malformed JSON or a non-string `message`; the result
    /// is cached after the first call.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message
            .get_or_init(|| {
                let raw = self.raw_error.as_deref().or(self.raw_body.as_deref())?;
                let json: Value = serde_json::from_str(raw).ok()?;
                json.get("message")?.as_str().map(str::to_owned)
            })
            .as_deref()
    }

    /// Whether a status message could be extracted.
    pub fn has_status_message(&self) -> bool {
        self.status_message().is_some()
    }

    /// Whether the server reported a missing or invalid bearer token.
    ///
    /// True only for status 401 with the canonical error body, byte for byte.
    pub fn is_unauthenticated(&self) -> bool {
        self.status == 401 && self.raw_error.as_deref() == Some(UNAUTHENTICATED_BODY)
    }

    /// Whether the server reported a missing token scope.
    ///
    /// True only for status 403 with an error body whose `message` equals the
    /// canonical scope-error text.
    pub fn has_invalid_scopes(&self) -> bool {
        if self.status != 403 {
            return false;
        }
        let Some(raw) = self.raw_error.as_deref() else { return false };
        let Ok(json) = serde_json::from_str::<Value>(raw) else { return false };
        json.get("message").and_then(Value::as_str) == Some(INVALID_SCOPES_MESSAGE)
    }

    /// Per-field validation errors from the error body's `errors` object.
    ///
    /// `None` if the error body is absent, malformed, or has no `errors`
    /// object; cached after the first call.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        self.validation_errors
            .get_or_init(|| parse_validation_errors(self.raw_error.as_deref()?))
            .as_ref()
    }

    /// Whether the error body carries at least one validation error.
    pub fn has_validation_errors(&self) -> bool {
        self.validation_errors().is_some_and(|errors| !errors.is_empty())
    }

    /// Parse the success body into `T`.
    ///
    /// # Errors
    ///
    /// An absent or malformed body is a caller contract violation and yields
    /// [`ApiError::Deserialize`]; check status and shape before parsing.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.raw_body.as_deref().unwrap_or("");
        serde_json::from_str(raw).map_err(ApiError::Deserialize)
    }

    /// Parse the error body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deserialize`] if the error body is absent or malformed.
    pub fn error_as<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.raw_error.as_deref().unwrap_or("");
        serde_json::from_str(raw).map_err(ApiError::Deserialize)
    }

    /// Parse the `extra` sub-object of the success body, if it is present and
    /// not null.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deserialize`] if the success body is not a JSON
    /// object or a present `extra` does not match `T`.
    pub fn extra<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let body: Value = self.body_as()?;
        match body.get("extra") {
            None | Some(Value::Null) => Ok(None),
            Some(extra) => Ok(Some(serde_json::from_value(extra.clone())?)),
        }
    }

    /// Require a specific status, consuming the envelope.
    ///
    /// # Errors
    ///
    /// Any other status yields [`ApiError::ResponseEvaluation`] carrying this
    /// envelope.
    pub fn require_status(self, expected: u16) -> Result<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(ApiError::ResponseEvaluation(self))
        }
    }

    /// Fail with [`ApiError::ValidationFailed`] if the server reported
    /// validation errors, otherwise pass the envelope through.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ValidationFailed`] carrying the field errors.
    pub fn require_valid(self) -> Result<Self> {
        match self.validation_errors() {
            Some(errors) if !errors.is_empty() => {
                Err(ApiError::ValidationFailed(errors.clone()))
            }
            _ => Ok(self),
        }
    }
}

fn parse_validation_errors(raw_error: &str) -> Option<ValidationErrors> {
    let json: Value = serde_json::from_str(raw_error).ok()?;
    let errors = json.get("errors")?.as_object()?;

    let violations = errors
        .iter()
        .map(|(field, value)| {
            let messages = value
                .as_array()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default();
            FieldErrors { field: field.clone(), messages }
        })
        .collect();

    Some(ValidationErrors { violations })
}

/// Validation errors of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    /// The offending field name.
    pub field: String,
    /// The server's messages for that field.
    pub messages: Vec<String>,
}

/// Server-reported validation errors, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldErrors>,
}

impl ValidationErrors {
    /// Whether no field has any message.
    pub fn is_empty(&self) -> bool {
        self.violations.iter().all(|v| v.messages.is_empty())
    }

    /// The messages reported for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.messages.as_slice())
    }

    /// Whether a field carries a message, compared case-insensitively.
    pub fn has(&self, field: &str, message: &str) -> bool {
        self.get(field).is_some_and(|messages| {
            messages.iter().any(|m| m.eq_ignore_ascii_case(message))
        })
    }

    /// The first message of the first violation, or `"error"` when the first
    /// violation has none. Later fields are not consulted.
    pub fn first(&self) -> &str {
        self.violations
            .first()
            .and_then(|v| v.messages.first())
            .map_or("error", String::as_str)
    }

    /// Iterate over the per-field errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldErrors> {
        self.violations.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        for FieldErrors { field, messages } in &self.violations {
            write!(f, "{sep}{field}: {messages:?}")?;
            sep = "; ";
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_requires_exact_body() {
        let exact = ApiResponse::new(
            401,
            None,
            Some(r#"{"message":"Unauthenticated."}"#.to_owned()),
        );
        assert!(exact.is_unauthenticated());

        // Same meaning, different bytes: not the canonical payload.
        let spaced = ApiResponse::new(
            401,
            None,
            Some(r#"{"message": "Unauthenticated."}"#.to_owned()),
        );
        assert!(!spaced.is_unauthenticated());

        let wrong_status = ApiResponse::new(
            403,
            None,
            Some(r#"{"message":"Unauthenticated."}"#.to_owned()),
        );
        assert!(!wrong_status.is_unauthenticated());
    }

    #[test]
    fn invalid_scopes_matches_message_field() {
        let scoped = ApiResponse::new(
            403,
            None,
            Some(r#"{"message":"Invalid scope(s) provided."}"#.to_owned()),
        );
        assert!(scoped.has_invalid_scopes());

        // Whitespace in the body is fine here; only the parsed message counts.
        let reformatted = ApiResponse::new(
            403,
            None,
            Some(r#"{ "message": "Invalid scope(s) provided." }"#.to_owned()),
        );
        assert!(reformatted.has_invalid_scopes());

        let other = ApiResponse::new(
            403,
            None,
            Some(r#"{"message":"Forbidden."}"#.to_owned()),
        );
        assert!(!other.has_invalid_scopes());

        let unparseable = ApiResponse::new(403, None, Some("not json".to_owned()));
        assert!(!unparseable.has_invalid_scopes());
    }

    #[test]
    fn sentinel_is_distinct_from_empty_envelope() {
        let sentinel = ApiResponse::no_connection();
        assert!(sentinel.is_no_connection());
        assert_eq!(sentinel.status(), 0);
        assert!(sentinel.raw_body().is_none());
        assert!(sentinel.raw_error().is_none());

        let lookalike = ApiResponse::new(0, None, None);
        assert!(!lookalike.is_no_connection());
    }

    #[test]
    fn status_message_prefers_error_body() {
        let response = ApiResponse::new(
            422,
            Some(r#"{"message":"from body"}"#.to_owned()),
            Some(r#"{"message":"from error"}"#.to_owned()),
        );
        assert_eq!(response.status_message(), Some("from error"));
    }

    #[test]
    fn status_message_degrades_on_malformed_response() {
        // Both bodies absent.
        let empty = ApiResponse::new(500, None, None);
        assert_eq!(empty.status_message(), None);
        assert!(!empty.has_status_message());

        // Non-string message.
        let numeric = ApiResponse::new(500, Some(r#"{"message":7}"#.to_owned()), None);
        assert_eq!(numeric.status_message(), None);

        // Not JSON at all.
        let garbage = ApiResponse::new(500, Some("<html>".to_owned()), None);
        assert_eq!(garbage.status_message(), None);
    }

    #[test]
    fn validation_errors_map_fields_to_messages() {
        let response = ApiResponse::new(
            422,
            None,
            Some(r#"{"errors":{"email":["required"],"name":["too short","taken"]}}"#.to_owned()),
        );

        let errors = response.validation_errors().unwrap();
        assert_eq!(errors.get("email").unwrap(), ["required"]);
        assert_eq!(errors.get("name").unwrap().len(), 2);
        assert!(errors.has("name", "TAKEN"));
        assert!(!errors.has("email", "taken"));
        assert_eq!(errors.first(), "required");
        assert!(response.has_validation_errors());
    }

    #[test]
    fn validation_errors_absent_or_malformed() {
        assert!(ApiResponse::new(422, None, None).validation_errors().is_none());
        assert!(ApiResponse::new(422, None, Some("nope".to_owned()))
            .validation_errors()
            .is_none());
        // An `errors` that is not an object does not count.
        assert!(ApiResponse::new(422, None, Some(r#"{"errors":[1,2]}"#.to_owned()))
            .validation_errors()
            .is_none());
        // Non-string entries inside a field's array are skipped.
        let mixed = ApiResponse::new(
            422,
            None,
            Some(r#"{"errors":{"age":["required",42]}}"#.to_owned()),
        );
        assert_eq!(mixed.validation_errors().unwrap().get("age").unwrap(), ["required"]);
    }

    #[test]
    fn first_only_consults_the_first_violation() {
        let response = ApiResponse::new(
            422,
            None,
            Some(r#"{"errors":{"age":[],"name":["too short"]}}"#.to_owned()),
        );
        let errors = response.validation_errors().unwrap();
        // "age" sorts first and has no messages; "name" is not consulted.
        assert_eq!(errors.first(), "error");
        assert!(!errors.is_empty());
    }

    #[test]
    fn empty_validation_errors_first_falls_back() {
        let response =
            ApiResponse::new(422, None, Some(r#"{"errors":{"email":[]}}"#.to_owned()));
        let errors = response.validation_errors().unwrap();
        assert!(errors.is_empty());
        assert_eq!(errors.first(), "error");
        assert!(!response.has_validation_errors());
    }

    #[test]
    fn body_parsing_is_a_contract() {
        #[derive(serde::Deserialize)]
        struct Payload {
            value: i32,
        }

        let ok = ApiResponse::new(200, Some(r#"{"value":3}"#.to_owned()), None);
        assert_eq!(ok.body_as::<Payload>().unwrap().value, 3);

        let absent = ApiResponse::new(200, None, None);
        assert!(matches!(absent.body_as::<Payload>(), Err(ApiError::Deserialize(_))));

        let malformed = ApiResponse::new(200, Some("{".to_owned()), None);
        assert!(matches!(malformed.body_as::<Payload>(), Err(ApiError::Deserialize(_))));
    }

    #[test]
    fn extra_payload_extraction() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Extra {
            note: String,
        }

        let with_extra = ApiResponse::new(
            200,
            Some(r#"{"id":1,"extra":{"note":"hi"}}"#.to_owned()),
            None,
        );
        assert_eq!(
            with_extra.extra::<Extra>().unwrap(),
            Some(Extra { note: "hi".to_owned() })
        );

        let without = ApiResponse::new(200, Some(r#"{"id":1}"#.to_owned()), None);
        assert_eq!(without.extra::<Extra>().unwrap(), None);

        let null = ApiResponse::new(200, Some(r#"{"extra":null}"#.to_owned()), None);
        assert_eq!(null.extra::<Extra>().unwrap(), None);
    }

    #[test]
    fn require_status_wraps_envelope() {
        let ok = ApiResponse::new(200, None, None).require_status(200);
        assert!(ok.is_ok());

        let err = ApiResponse::new(404, None, None).require_status(200);
        match err {
            Err(ApiError::ResponseEvaluation(response)) => assert_eq!(response.status(), 404),
            other => panic!("expected ResponseEvaluation, got {other:?}"),
        }
    }

    #[test]
    fn require_valid_raises_validation_failure() {
        let invalid = ApiResponse::new(
            422,
            None,
            Some(r#"{"errors":{"email":["required"]}}"#.to_owned()),
        );
        match invalid.require_valid() {
            Err(ApiError::ValidationFailed(errors)) => assert_eq!(errors.first(), "required"),
            other => panic!("expected ValidationFailed, got {other:?}"),
        }

        assert!(ApiResponse::new(200, None, None).require_valid().is_ok());
    }
}
