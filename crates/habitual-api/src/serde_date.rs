//! Strict `YYYY-MM-DD` serde adapters for `NaiveDate` fields
//!
//! Use with `#[serde(with = "habitual_api::serde_date")]`, or the `option`
//! submodule for optional dates.

use chrono::NaiveDate;
use habitual_util::{format_date, parse_date};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(serde::de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_some(&format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts `null`, a missing field (with `#[serde(default)]`), or an
    /// empty string as "no date".
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        habitual_util::parse_optional_date(s.as_deref()).map_err(serde::de::Error::custom)
    }
}
