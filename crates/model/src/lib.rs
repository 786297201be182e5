//! # LCLPNetwork Model
//!
//! Payload types exchanged with the LCLPNetwork API.
//!
//! This crate contains:
//! - Account types ([`User`])
//! - Minecraft types ([`McUser`], [`McPlayer`], [`McStats`])
//! - Per-field date (de)serialization modules ([`datetime`])
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Pure data structures; all network access lives in `lclpnetwork-client`
//!
//! Which fields of a payload are written to the wire versus only read from it
//! is declared per field with serde attributes. Sensitive fields such as
//! [`User::email`] deserialize from server responses but are never serialized
//! back out.

pub mod datetime;
pub mod minecraft;
pub mod stats;
pub mod user;

pub use minecraft::{McPlayer, McUser};
pub use stats::{Entry, EntryType, Icon, McStats, StatValue, ValueType};
pub use user::User;
