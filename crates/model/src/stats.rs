//! Player statistics payloads.
//!
//! Statistics are a versioned tree of modules. Each entry carries typed
//! property values; the wire encodes a value's type next to its raw JSON
//! value, so [`StatValue`] keeps the raw value and interprets it on demand.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::datetime;

/// Statistics of a tracked Minecraft player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McStats {
    /// Version of the statistics schema this payload was produced with.
    pub schema_version: u32,
    /// Top-level statistics modules.
    #[serde(default)]
    pub stats: Vec<Entry>,
}

impl McStats {
    /// Look up a top-level module by name.
    pub fn module(&self, name: &str) -> Option<&Entry> {
        self.stats.iter().find(|entry| entry.name == name)
    }
}

/// One statistics entry; may nest further entries through `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// What kind of entry this is.
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Stable machine name, used for module lookup.
    pub name: String,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display icon hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Typed property values of this entry.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, StatValue>,
    /// Free-form supplementary data.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entry>,
}

/// The kind of a statistics [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Network-wide statistics.
    General,
    /// Statistics of one game mode.
    Game,
    /// A grouping node holding child entries.
    Group,
}

/// A typed property value of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    /// How `value` should be interpreted.
    #[serde(rename = "type")]
    pub kind: ValueType,
    /// The raw JSON value.
    #[serde(default)]
    pub value: Value,
}

impl StatValue {
    /// Whether the raw value is absent or JSON null.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// The value as an integer; null counts as 0.
    pub fn as_int(&self) -> i64 {
        self.value.as_i64().unwrap_or(0)
    }

    /// The value parsed as a microsecond-precision UTC timestamp.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        let raw = self.value.as_str()?;
        datetime::utc_micros::parse(raw).ok()
    }

    /// Render the value for display. Null dates render as `Never`.
    pub fn formatted(&self) -> String {
        match self.kind {
            ValueType::Int => self.as_int().to_string(),
            ValueType::Date => match self.as_date() {
                Some(date) => date.to_string(),
                None => "Never".to_owned(),
            },
        }
    }
}

/// The value type of a [`StatValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Integer value.
    Int,
    /// Timestamp value in the microsecond UTC format.
    Date,
}

/// Icon hints for rendering an [`Entry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    /// A Minecraft item id to use as the icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minecraft: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS_JSON: &str = r#"{
        "schema_version": 1,
        "stats": [
            {
                "type": "general",
                "name": "general",
                "title": "General",
                "icon": {"minecraft": "minecraft:emerald"},
                "properties": {
                    "points": {"type": "int", "value": 120},
                    "last_played": {"type": "date", "value": "2021-04-25T18:24:19.561790Z"}
                }
            },
            {
                "type": "group",
                "name": "games",
                "children": [
                    {"type": "game", "name": "bedwars", "properties": {"wins": {"type": "int", "value": 3}}}
                ]
            }
        ]
    }"#;

    #[test]
    fn deserializes_nested_modules() {
        let stats: McStats = serde_json::from_str(STATS_JSON).unwrap();
        assert_eq!(stats.schema_version, 1);
        assert_eq!(stats.stats.len(), 2);

        let games = stats.module("games").unwrap();
        assert_eq!(games.kind, EntryType::Group);
        assert_eq!(games.children[0].name, "bedwars");

        assert!(stats.module("missing").is_none());
    }

    #[test]
    fn interprets_typed_values() {
        let stats: McStats = serde_json::from_str(STATS_JSON).unwrap();
        let general = stats.module("general").unwrap();

        let points = &general.properties["points"];
        assert_eq!(points.as_int(), 120);
        assert_eq!(points.formatted(), "120");

        let last_played = &general.properties["last_played"];
        assert!(last_played.as_date().is_some());
        assert_ne!(last_played.formatted(), "Never");
    }

    #[test]
    fn stats_round_trip() {
        let stats: McStats = serde_json::from_str(STATS_JSON).unwrap();
        let wire = serde_json::to_string(&stats).unwrap();
        let again: McStats = serde_json::from_str(&wire).unwrap();
        assert_eq!(again, stats);
        // Property maps have no stable order; compare as values, not strings.
        let first: Value = serde_json::from_str(&wire).unwrap();
        let second: Value =
            serde_json::from_str(&serde_json::to_string(&again).unwrap()).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn null_date_renders_as_never() {
        let value = StatValue { kind: ValueType::Date, value: Value::Null };
        assert!(value.is_null());
        assert_eq!(value.formatted(), "Never");
    }

    #[test]
    fn empty_stats_payload() {
        let stats: McStats =
            serde_json::from_str(r#"{"schema_version":1,"stats":[]}"#).unwrap();
        assert_eq!(stats.schema_version, 1);
        assert!(stats.stats.is_empty());
    }
}
