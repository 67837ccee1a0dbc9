//! Type-tagged interchange form.
//!
//! Converts a [`Document`] into the shape used by language-independent
//! compliance suites: every scalar becomes a `{ "type": ..., "value": ... }`
//! pair whose value is the scalar's string form, arrays become
//! `{ "type": "array", "value": [...] }`, tables stay plain maps and table
//! arrays become plain sequences of maps.
//!
//! The result implements [`Serialize`], so any Serde format can emit it.
//!
//! ```rust
//! use serde_tomlite::{parse, tagged::Tagged};
//!
//! let doc = parse("age = 27").unwrap();
//! let tagged = doc.to_tagged();
//! let Tagged::Table(entries) = tagged else { panic!("expected table") };
//! assert_eq!(
//!     entries.get("age"),
//!     Some(&Tagged::Scalar { kind: "integer", value: "27".to_string() })
//! );
//! ```

use crate::value::format_datetime;
use crate::{Document, Value};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A document or value in its type-tagged form.
#[derive(Clone, Debug, PartialEq)]
pub enum Tagged {
    /// A scalar with its type name and string form.
    Scalar { kind: &'static str, value: String },
    /// A value array; serialized with its `array` type tag.
    Array(Vec<Tagged>),
    /// A table, serialized as a plain map.
    Table(IndexMap<String, Tagged>),
    /// An array of tables, serialized as a plain sequence.
    Tables(Vec<Tagged>),
}

/// Converts a whole document.
#[must_use]
pub fn to_tagged(document: &Document) -> Tagged {
    Tagged::Table(
        document
            .iter()
            .map(|(k, v)| (k.clone(), tag_value(v)))
            .collect(),
    )
}

/// Converts a single value.
#[must_use]
pub fn tag_value(value: &Value) -> Tagged {
    match value {
        Value::String(s) => Tagged::Scalar {
            kind: value.type_name(),
            value: s.clone(),
        },
        Value::Integer(i) => Tagged::Scalar {
            kind: value.type_name(),
            value: i.to_string(),
        },
        Value::Float(f) => Tagged::Scalar {
            kind: value.type_name(),
            value: format!("{:?}", f),
        },
        Value::Boolean(b) => Tagged::Scalar {
            kind: value.type_name(),
            value: b.to_string(),
        },
        Value::DateTime(dt) => Tagged::Scalar {
            kind: value.type_name(),
            value: format_datetime(dt),
        },
        Value::Array(items) => Tagged::Array(items.iter().map(tag_value).collect()),
        Value::Table(doc) => to_tagged(doc),
        Value::TableArray(docs) => Tagged::Tables(docs.iter().map(to_tagged).collect()),
    }
}

impl Serialize for Tagged {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Tagged::Scalar { kind, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", kind)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Tagged::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("value", items)?;
                map.end()
            }
            Tagged::Table(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Tagged::Tables(tables) => serializer.collect_seq(tables),
        }
    }
}
