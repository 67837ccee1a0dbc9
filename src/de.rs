//! Serde deserialization from parsed documents.
//!
//! This module provides the [`Deserializer`] that feeds a parsed
//! [`Document`] to any `T: Deserialize`.
//!
//! ## Type Mapping
//!
//! | Value | Visited as |
//! |-------|------------|
//! | `String` | `str` |
//! | `Integer` | `i64` |
//! | `Float` | `f64` |
//! | `Boolean` | `bool` |
//! | `DateTime` | `str` (`YYYY-MM-DDTHH:MM:SSZ`) |
//! | `Array`, `TableArray` | sequence |
//! | `Table` | map |
//!
//! Missing keys deserialize to `None` for `Option` fields, as with any
//! self-describing format.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_tomlite::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { ip: String, ports: Vec<u16> }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { server: Server }
//!
//! let config: Config = from_str("[server]\nip = \"10.0.0.1\"\nports = [80, 443]").unwrap();
//! assert_eq!(config.server.ports, vec![80, 443]);
//! ```

use crate::value::format_datetime;
use crate::{Document, Error, Result, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// Deserializes Rust values out of a parsed [`Document`] or [`Value`].
pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    /// Parses `input` and prepares to deserialize its root table.
    ///
    /// # Errors
    ///
    /// Returns any parse error.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        crate::parse(input).map(Self::from_document)
    }

    #[must_use]
    pub fn from_document(document: Document) -> Self {
        Deserializer {
            value: Value::Table(document),
        }
    }

    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Deserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::DateTime(dt) => visitor.visit_string(format_datetime(&dt)),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Table(doc) => visitor.visit_map(MapDeserializer::new(doc)),
            Value::TableArray(docs) => visitor.visit_seq(SeqDeserializer::new(
                docs.into_iter().map(Value::Table).collect(),
            )),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // Absent keys never reach here; a present key is always `Some`.
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(doc) => {
                let mut entries = doc.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    _ => Err(Error::custom("expected a table with exactly one key for enum")),
                }
            }
            other => Err(Error::custom(format!(
                "expected string or table for enum, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(Deserializer::from_value(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(doc: Document) -> Self {
        MapDeserializer {
            iter: doc.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Deserializer::from_value(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::from_value(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Deserializer::from_value(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::custom("expected a bare string for unit variant"))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::from_value(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected array for tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Table(doc) => visitor.visit_map(MapDeserializer::new(doc)),
            _ => Err(Error::custom("expected table for struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Mode {
        Fast,
        Safe,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Settings {
        mode: Mode,
        retries: u8,
        ratio: f64,
        label: Option<String>,
    }

    #[test]
    fn test_struct_with_enum_and_option() {
        let doc = crate::parse("mode = \"safe\"\nretries = 3\nratio = 0.5").unwrap();
        let settings = Settings::deserialize(Deserializer::from_document(doc)).unwrap();
        assert_eq!(
            settings,
            Settings {
                mode: Mode::Safe,
                retries: 3,
                ratio: 0.5,
                label: None,
            }
        );
    }

    #[test]
    fn test_integer_out_of_range_for_target() {
        let doc = crate::parse("mode = \"fast\"\nretries = 300\nratio = 0.5").unwrap();
        let err = Settings::deserialize(Deserializer::from_document(doc)).unwrap_err();
        assert!(matches!(err, Error::Message(_)));
    }

    #[test]
    fn test_table_array_as_seq() {
        #[derive(Deserialize)]
        struct Item {
            name: Option<String>,
        }
        #[derive(Deserialize)]
        struct Root {
            items: Vec<Item>,
        }

        let doc = crate::parse("[[items]]\nname = \"a\"\n[[items]]\n[[items]]\nname = \"c\"").unwrap();
        let root = Root::deserialize(Deserializer::from_document(doc)).unwrap();
        let names: Vec<Option<String>> = root.items.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec![Some("a".to_string()), None, Some("c".to_string())]);
    }
}
