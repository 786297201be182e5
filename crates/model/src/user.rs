//! LCLPNetwork account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime;

/// An LCLPNetwork user account.
///
/// `email` and `email_verified_at` are only ever read from the server; they
/// are skipped on serialization so that account data forwarded by a client
/// never leaks the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// E-mail address; deserialize-only.
    #[serde(default, skip_serializing)]
    pub email: Option<String>,
    /// When the e-mail address was verified, if it was; deserialize-only.
    #[serde(default, skip_serializing, with = "datetime::utc_micros::option")]
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Account creation timestamp.
    #[serde(
        default,
        with = "datetime::utc_micros::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(
        default,
        with = "datetime::utc_micros::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the display name was last changed.
    #[serde(
        default,
        with = "datetime::utc_micros::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub name_changed_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account's e-mail address has been verified.
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = concat!(
        r#"{"id":21,"name":"Tester","email":"tester@example.com","#,
        r#""email_verified_at":null,"#,
        r#""created_at":"2021-04-25T18:24:19.561790Z","#,
        r#""updated_at":"2021-04-25T18:24:19.561790Z","#,
        r#""name_changed_at":null}"#
    );

    #[test]
    fn deserializes_full_payload() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        assert_eq!(user.id, 21);
        assert_eq!(user.name, "Tester");
        assert_eq!(user.email.as_deref(), Some("tester@example.com"));
        assert!(!user.is_verified());
        assert!(user.created_at.is_some());
        assert!(user.name_changed_at.is_none());
    }

    #[test]
    fn email_is_never_serialized() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        let out = serde_json::to_string(&user).unwrap();
        assert!(!out.contains("email"));
        assert!(!out.contains("tester@example.com"));
    }

    #[test]
    fn serialization_round_trips() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        let wire = serde_json::to_string(&user).unwrap();
        let again: User = serde_json::from_str(&wire).unwrap();
        // Deserialize-only fields are lost by design; everything else survives.
        assert_eq!(again.id, user.id);
        assert_eq!(again.name, user.name);
        assert_eq!(again.created_at, user.created_at);
        assert_eq!(serde_json::to_string(&again).unwrap(), wire);
    }
}
