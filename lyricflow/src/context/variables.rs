//! The shared variable store threaded through a pipeline run.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// String-keyed, string-valued store that only grows.
///
/// Keys are never removed. Iteration follows first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from initial inputs.
    pub fn from_inputs<K, V>(inputs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        for (key, value) in inputs {
            ctx.insert(key, value);
        }
        ctx
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Inserts a value, returning the previous value if the key existed.
    ///
    /// An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let previous = self.values.insert(key.clone(), value.into());
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the context is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key.as_str(), value.as_str())))
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_inputs() {
        let ctx = Context::from_inputs([("lyrics", "la la la")]);
        assert_eq!(ctx.get("lyrics"), Some("la la la"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut ctx = Context::new();
        ctx.insert("lyrics", "a");
        ctx.insert("summary", "b");
        ctx.insert("genre", "c");

        assert_eq!(ctx.keys(), vec!["lyrics", "summary", "genre"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut ctx = Context::from_inputs([("a", "1"), ("b", "2")]);
        let previous = ctx.insert("a", "3");

        assert_eq!(previous, Some("1".to_string()));
        assert_eq!(ctx.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_missing_key() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert!(!ctx.contains_key("lyrics"));
        assert_eq!(ctx.get("lyrics"), None);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let ctx = Context::from_inputs([("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
