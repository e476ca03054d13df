//! Serde helpers for quirks of the backend's JSON dialect.

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use std::fmt;

/// Datetime layout used by the backend (`strftime('%Y-%m-%d %H:%M:%S')`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifiers arrive as JSON integers from the backend but are strings
/// throughout the client. Accept both on the way in, emit strings on the
/// way out.
pub mod id {
    use super::*;

    pub fn serialize<S: Serializer>(value: &str, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = String;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
                Ok(v.to_owned())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
                Ok(v.to_string())
            }
        }

        de.deserialize_any(IdVisitor)
    }
}

/// Like [`id`], but for optional identifier fields.
pub mod id_opt {
    use super::*;
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(value: &Option<String>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => ser.serialize_some(v),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(i64),
        }

        Ok(Option::<Raw>::deserialize(de)?.map(|raw| match raw {
            Raw::Str(s) => s,
            Raw::Int(n) => n.to_string(),
        }))
    }
}

/// Optional naive datetime in the backend's `%Y-%m-%d %H:%M:%S` layout.
pub mod datetime_opt {
    use super::*;
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => ser.serialize_some(&dt.format(DATETIME_FORMAT).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        match raw {
            None => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("bad datetime {s:?}: {e}"))),
        }
    }
}
