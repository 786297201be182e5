//! Per-field date (de)serialization.
//!
//! The API uses two textual date formats: most timestamps are UTC with
//! microsecond precision (`2021-04-25T18:24:19.561790Z`), while a few coarser
//! fields use `2021-04-25 18:24:19`. The format is chosen per field with
//! `#[serde(with = "...")]`, never globally.

use chrono::{DateTime, NaiveDateTime, Utc};

/// UTC timestamps with microsecond precision, e.g. `2021-04-25T18:24:19.561790Z`.
pub mod utc_micros {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    /// The chrono format string for this representation.
    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

    /// Serialize a timestamp in the microsecond UTC format.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying serializer.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// Deserialize a timestamp from the microsecond UTC format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or does not match the format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse(raw: &str) -> chrono::ParseResult<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, FORMAT).map(|naive| naive.and_utc())
    }

    /// Variant of [`utc_micros`](self) for nullable fields.
    pub mod option {
        use super::*;

        /// Serialize an optional timestamp; `None` becomes JSON null.
        ///
        /// # Errors
        ///
        /// Returns any error raised by the underlying serializer.
        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional timestamp; JSON null becomes `None`.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value does not match the format.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Coarse `year-month-day hour:minute:second` timestamps, e.g. `2021-04-25 18:24:19`.
pub mod ymd_hms {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    /// The chrono format string for this representation.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serialize a timestamp in the coarse format.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying serializer.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// Deserialize a timestamp from the coarse format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or does not match the format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse(raw: &str) -> chrono::ParseResult<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, FORMAT).map(|naive| naive.and_utc())
    }

    /// Variant of [`ymd_hms`](self) for nullable fields.
    pub mod option {
        use super::*;

        /// Serialize an optional timestamp; `None` becomes JSON null.
        ///
        /// # Errors
        ///
        /// Returns any error raised by the underlying serializer.
        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional timestamp; JSON null becomes `None`.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value does not match the format.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
