//! Ordered map type for plist dictionaries.
//!
//! [`PlistMap`] wraps [`IndexMap`] so that dictionaries keep the order their
//! entries appeared in the document. Order is not meaningful to the format
//! itself (the writer sorts keys by default) but keeping it makes
//! `sort_keys = false` round-trips faithful.
//!
//! ## Examples
//!
//! ```rust
//! use serde_textplist::{PlistMap, Value};
//!
//! let mut map = PlistMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map of string keys to plist values.
///
/// Inserting an existing key replaces its value but keeps its original position,
/// which gives dictionary parsing its last-write-wins behavior.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{PlistMap, Value};
///
/// let mut map = PlistMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(map.get("first").and_then(|v| v.as_i64()), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlistMap(IndexMap<String, Value>);

impl PlistMap {
    #[must_use]
    pub fn new() -> Self {
        PlistMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        PlistMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for that key.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts entries by key (code point order).
    pub fn sort_keys(&mut self) {
        self.0.sort_keys();
    }

    /// If this map is exactly `{ "CF$UID" = <int>; }`, returns the integer.
    #[must_use]
    pub fn as_cfuid(&self) -> Option<i64> {
        if self.0.len() != 1 {
            return None;
        }
        match self.0.get(crate::CFUID_KEY) {
            Some(Value::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for PlistMap {
    fn from(map: HashMap<String, Value>) -> Self {
        PlistMap(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for PlistMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        PlistMap(map.into_iter().collect())
    }
}

impl From<PlistMap> for HashMap<String, Value> {
    fn from(map: PlistMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for PlistMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlistMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for PlistMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        PlistMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_cfuid() {
        let mut map = PlistMap::new();
        map.insert("CF$UID".to_string(), Value::Int(7));
        assert_eq!(map.as_cfuid(), Some(7));

        map.insert("other".to_string(), Value::Int(1));
        assert_eq!(map.as_cfuid(), None);

        let mut map = PlistMap::new();
        map.insert("CF$UID".to_string(), Value::from("7"));
        assert_eq!(map.as_cfuid(), None);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: PlistMap = vec![
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from(2)),
            ("c".to_string(), Value::from(3)),
        ]
        .into_iter()
        .collect();
        map.remove("a");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_sort_keys() {
        let mut map: PlistMap = vec![
            ("b".to_string(), Value::Null),
            ("B".to_string(), Value::Null),
            ("a".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        map.sort_keys();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["B", "a", "b"]);
    }
}
