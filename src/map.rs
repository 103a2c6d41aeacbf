//! Ordered map type for SNBT compounds.
//!
//! [`Compound`] wraps an [`IndexMap`] so that keys iterate in the order they
//! were first inserted. The encoder does not rely on that order (it always
//! writes keys sorted), but callers inspecting a decoded document see fields in
//! the order the file lists them.
//!
//! Besides the usual map operations, `Compound` carries typed getters for the
//! lookups callers do over and over on decoded quest files:
//!
//! ```rust
//! use serde_snbt::decode;
//!
//! let chapter = decode(r#"{ title: "Intro", subtitle: ["a", 1, "b"] }"#).unwrap();
//! let chapter = chapter.as_compound().unwrap();
//!
//! assert!(chapter.has("title"));
//! assert_eq!(chapter.get_str("title"), Some("Intro"));
//! assert_eq!(chapter.get_strings("subtitle"), vec!["a", "b"]);
//! assert_eq!(chapter.get_str("missing"), None);
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::ops::Index;

/// An insertion-ordered map of string keys to SNBT values.
///
/// Inserting an existing key replaces its value in place (last write wins)
/// without moving the key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound(IndexMap<String, Value>);

impl Compound {
    /// Creates an empty `Compound`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_snbt::Compound;
    ///
    /// let map = Compound::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Compound(IndexMap::new())
    }

    /// Creates an empty `Compound` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Compound(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_snbt::{Compound, Value};
    ///
    /// let mut map = Compound::new();
    /// assert!(map.insert("key", Value::from(42)).is_none());
    /// assert_eq!(map.insert("key", Value::from(43)), Some(Value::from(42)));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Removes a key, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the map has a value for `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value of `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the value of `key` if it is a list.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_list)
    }

    /// Returns the value of `key` if it is a compound.
    #[must_use]
    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(Value::as_compound)
    }

    /// Returns the string elements of the list stored under `key`.
    ///
    /// Non-string elements are skipped; a missing key or a non-list value
    /// yields an empty vector.
    #[must_use]
    pub fn get_strings(&self, key: &str) -> Vec<&str> {
        self.get_list(key)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
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

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns a mutable iterator over the entries, in insertion order.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.0.iter_mut()
    }

    /// Entries ordered by key bytes, the order the encoder writes them in.
    pub(crate) fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Index<&str> for Compound {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &str) -> &Value {
        match self.0.get(key) {
            Some(value) => value,
            None => panic!("key `{}` not present in compound", key),
        }
    }
}

impl From<HashMap<String, Value>> for Compound {
    fn from(map: HashMap<String, Value>) -> Self {
        Compound(map.into_iter().collect())
    }
}

impl From<Compound> for HashMap<String, Value> {
    fn from(map: Compound) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Compound(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut map = Compound::new();
        map.insert("b", Value::from(1));
        map.insert("a", Value::from(2));
        map.insert("b", Value::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map["b"], Value::from(3));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map: Compound = [("x", 1), ("y", 2), ("z", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        assert_eq!(map.remove("y"), Some(Value::from(2)));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["x", "z"]);
    }

    #[test]
    fn test_sorted_entries() {
        let mut map = Compound::new();
        map.insert("zeta", Value::from(1));
        map.insert("Alpha", Value::from(2));
        map.insert("alpha", Value::from(3));
        let keys: Vec<_> = map.sorted_entries().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Alpha", "alpha", "zeta"]);
    }

    #[test]
    fn test_typed_getters() {
        let mut map = Compound::new();
        map.insert("name", Value::from("quest"));
        map.insert("count", Value::from(3));
        map.insert(
            "tags",
            Value::List(vec![Value::from("a"), Value::from(true), Value::from("b")]),
        );

        assert_eq!(map.get_str("name"), Some("quest"));
        assert_eq!(map.get_str("count"), None);
        assert_eq!(map.get_strings("tags"), vec!["a", "b"]);
        assert!(map.get_strings("name").is_empty());
        assert!(map.get_list("missing").is_none());
        assert!(map.get_compound("name").is_none());
    }
}
