//! Account endpoints.

use lclpnetwork_model::User;

use crate::access::ApiAccess;
use crate::error::Result;
use crate::json::object;

/// Requests against the account endpoints.
#[derive(Debug, Clone)]
pub struct NetworkApi {
    access: ApiAccess,
}

impl NetworkApi {
    /// Wrap an access context.
    pub fn new(access: impl Into<ApiAccess>) -> Self {
        Self { access: access.into() }
    }

    /// The underlying access context.
    pub fn access(&self) -> &ApiAccess {
        &self.access
    }

    /// Fetch a user by account id. `None` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors; a present 200 body that does not deserialize
    /// is an [`crate::ApiError::Deserialize`].
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let response = self
            .access
            .post("api/user", Some(object().set("userId", user_id).create_object()))
            .await?;
        if response.status() != 200 {
            return Ok(None);
        }
        response.body_as().map(Some)
    }

    /// Fetch the account the context's token belongs to.
    ///
    /// Requires authentication; without it the pipeline raises
    /// [`crate::ApiError::Unauthenticated`] under the default policy.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_current_user(&self) -> Result<Option<User>> {
        let response = self.access.get("api/auth/user").await?;
        if response.status() != 200 {
            return Ok(None);
        }
        response.body_as().map(Some)
    }

    /// Whether the current account's e-mail address is verified.
    ///
    /// `None` when the current user could not be fetched.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn is_current_user_verified(&self) -> Result<Option<bool>> {
        Ok(self.get_current_user().await?.map(|user| user.is_verified()))
    }

    /// Revoke the token this context authenticates with.
    ///
    /// Requires the `revoke-self` scope server-side.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn revoke_current_token(&self) -> Result<bool> {
        let response = self.access.post("api/auth/revoke", None).await?;
        Ok(matches!(response.status(), 200 | 201))
    }
}
