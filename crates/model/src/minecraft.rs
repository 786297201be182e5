//! Minecraft account and player types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::user::User;

/// A Minecraft account linked to an LCLPNetwork user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McUser {
    /// Id of the owning LCLPNetwork account.
    pub user_id: i64,
    /// Minecraft account UUID, with dashes.
    pub uuid: String,
    /// Link creation timestamp.
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
    /// The owning account, when the server expanded the relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// The tracked player, when the server expanded the relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<McPlayer>,
}

/// A Minecraft player tracked on the network's game servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McPlayer {
    /// Player record id.
    pub id: i64,
    /// Minecraft account UUID, with dashes.
    pub uuid: String,
    /// Earned points.
    #[serde(default)]
    pub points: i32,
    /// Coin balance.
    #[serde(default)]
    pub coins: i32,
    /// Preferred language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// When the player was last seen on a server. This field uses the coarse
    /// date format, unlike the other timestamps.
    #[serde(
        default,
        with = "datetime::ymd_hms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_seen: Option<DateTime<Utc>>,
    /// The linked Minecraft account, when the server expanded the relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc_user: Option<Box<McUser>>,
}
