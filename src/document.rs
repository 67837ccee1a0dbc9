//! Ordered table type.
//!
//! This module provides [`Document`], a wrapper around [`IndexMap`] that maps
//! keys to [`Value`]s while preserving insertion order. A `Document` is both
//! the top-level parse result and the contents of every nested table.
//!
//! Keys are unique within one `Document`; the parser rejects a second
//! assignment to the same key, so [`Document::insert`] returning `Some` only
//! happens for documents built by hand.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlite::{Document, Value};
//!
//! let mut doc = Document::new();
//! doc.insert("name".to_string(), Value::from("Alice"));
//! doc.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(doc.len(), 2);
//! assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered map of string keys to values.
///
/// # Examples
///
/// ```rust
/// use serde_tomlite::{Document, Value};
///
/// let mut doc = Document::new();
/// doc.insert("first".to_string(), Value::from(1));
/// doc.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = doc.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(IndexMap<String, Value>);

impl Document {
    /// Creates an empty `Document`.
    #[must_use]
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    /// Creates an empty `Document` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Document(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair.
    ///
    /// If the document already contained this key, the value is replaced in
    /// place (keeping its position) and the old value is returned.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the document contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Looks up a value by a dotted path such as `"servers.alpha.ip"`.
    ///
    /// Table arrays are not traversed; use [`Value::as_table_array`] for those.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlite::parse;
    ///
    /// let doc = parse("[main.beta]\nip = \"192.168.1.1\"").unwrap();
    /// assert_eq!(
    ///     doc.get_path("main.beta.ip").and_then(|v| v.as_str()),
    ///     Some("192.168.1.1")
    /// );
    /// ```
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the document contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Converts this document into the `{type, value}` interchange form.
    ///
    /// See [`crate::tagged`] for the exact shape.
    #[must_use]
    pub fn to_tagged(&self) -> crate::tagged::Tagged {
        crate::tagged::to_tagged(self)
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Document(IndexMap::from_iter(iter))
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let doc: Document = ["zeta", "alpha", "mid"]
            .iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), Value::from(i as i64)))
            .collect();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut doc = Document::new();
        assert!(doc.insert("a".to_string(), Value::from(1)).is_none());
        doc.insert("b".to_string(), Value::from(2));
        assert_eq!(doc.insert("a".to_string(), Value::from(3)), Some(Value::from(1)));
        assert_eq!(doc.keys().next().map(String::as_str), Some("a"));
        assert_eq!(doc.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_get_path() {
        let mut inner = Document::new();
        inner.insert("ip".to_string(), Value::from("10.0.0.1"));
        let mut doc = Document::new();
        doc.insert("server".to_string(), Value::Table(inner));

        assert_eq!(
            doc.get_path("server.ip").and_then(Value::as_str),
            Some("10.0.0.1")
        );
        assert!(doc.get_path("server.port").is_none());
        assert!(doc.get_path("server.ip.deeper").is_none());
    }
}
