//! Minecraft endpoints.

use lclpnetwork_model::{McPlayer, McStats, McUser, User};
use serde_json::Value;

use crate::access::ApiAccess;
use crate::error::{ApiError, Result};
use crate::json::object;

/// Requests against the Minecraft endpoints.
#[derive(Debug, Clone)]
pub struct MinecraftApi {
    access: ApiAccess,
}

impl MinecraftApi {
    /// Wrap an access context.
    pub fn new(access: impl Into<ApiAccess>) -> Self {
        Self { access: access.into() }
    }

    /// The underlying access context.
    pub fn access(&self) -> &ApiAccess {
        &self.access
    }

    /// Fetch the account that linked the Minecraft account with this UUID.
    /// `None` if nobody linked an account with that UUID.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<User>> {
        Ok(self.get_mc_user_by_uuid(uuid).await?.and_then(|mc_user| mc_user.user))
    }

    /// Fetch a linked Minecraft account by UUID.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_mc_user_by_uuid(&self, uuid: &str) -> Result<Option<McUser>> {
        self.fetch("api/mc/user", object().set("uuid", uuid).create_object()).await
    }

    /// Fetch a linked Minecraft account by the owning account's id.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_mc_user_by_user_id(&self, user_id: i64) -> Result<Option<McUser>> {
        self.fetch("api/mc/user-by-user-id", object().set("userId", user_id).create_object())
            .await
    }

    /// Fetch a tracked player by UUID. `None` if the network never saw the
    /// account.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_mc_player_by_uuid(&self, uuid: &str) -> Result<Option<McPlayer>> {
        self.fetch("api/mc/player", object().set("uuid", uuid).create_object()).await
    }

    /// Fetch a tracked player by player record id.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_mc_player_by_id(&self, player_id: i64) -> Result<Option<McPlayer>> {
        self.fetch("api/mc/player-by-id", object().set("playerId", player_id).create_object())
            .await
    }

    /// Fetch a tracked player by the owning account's id.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_mc_player_by_user_id(&self, user_id: i64) -> Result<Option<McPlayer>> {
        self.fetch(
            "api/mc/player-by-user-id",
            object().set("userId", user_id).create_object(),
        )
        .await
    }

    /// Fetch a player's statistics by UUID, optionally restricted to the
    /// named modules. `None` fetches every module.
    ///
    /// # Errors
    ///
    /// Returns pipeline errors.
    pub async fn get_stats(
        &self,
        uuid: &str,
        modules: Option<&[&str]>,
    ) -> Result<Option<McStats>> {
        let mut builder = object().set("uuid", uuid);
        if let Some(modules) = modules {
            builder = builder
                .begin_array("modules")
                .add_all(modules.iter().copied())
                .end_array();
        }
        self.fetch("api/mc/stats", builder.create_object()).await
    }

    /// Request a one-time token for linking a Minecraft account.
    ///
    /// Requires authentication and the `minecraft` scope server-side; under
    /// the default policy those failures surface from the pipeline.
    ///
    /// # Errors
    ///
    /// A 201 response without a string `token` field is a shape violation and
    /// yields [`ApiError::ResponseEvaluation`].
    pub async fn request_mc_link_token(&self) -> Result<Option<String>> {
        let response = self.access.post("api/mc/request-mclink-token", None).await?;
        if response.status() != 201 {
            return Ok(None);
        }

        let body: Value = response.body_as()?;
        match body.get("token").and_then(Value::as_str) {
            Some(token) => Ok(Some(token.to_owned())),
            None => Err(ApiError::ResponseEvaluation(response)),
        }
    }

    /// POST `body`, expecting 200 with a deserializable payload; any other
    /// status means "not found".
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Option<T>> {
        let response = self.access.post(path, Some(body)).await?;
        if response.status() != 200 {
            return Ok(None);
        }
        response.body_as().map(Some)
    }
}
