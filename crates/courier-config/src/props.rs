//! Insertion-ordered property bags.
//!
//! A [`PropertyBag`] is the substitution context handed to the template
//! resolver and the shape produced by masked `as_map` introspection. Bags are
//! rebuilt on every resolution call; nothing here is cached.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered, string-keyed mapping from names to values.
///
/// Values are strings, numbers, booleans or nested bags. Nested entries are
/// addressed with dotted paths through [`PropertyBag::lookup`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(Map<String, Value>);

impl PropertyBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a value, returning the previous one if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a nested bag under `key`.
    pub fn insert_bag(&mut self, key: impl Into<String>, bag: PropertyBag) -> Option<Value> {
        self.0.insert(key.into(), Value::Object(bag.0))
    }

    /// Get a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path (`artifact.fileName`) through nested bags.
    ///
    /// A top-level key that literally contains dots wins over path traversal.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Overlay every entry of `other` onto this bag. Last writer wins.
    pub fn extend(&mut self, other: &PropertyBag) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Overlay string pairs onto this bag. Last writer wins.
    pub fn extend_strings<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in pairs {
            self.0.insert(key.clone(), Value::String(value.clone()));
        }
    }

    /// Whether `key` is present at the top level.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<PropertyBag> for Value {
    fn from(bag: PropertyBag) -> Self {
        Value::Object(bag.0)
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let bag = PropertyBag::new()
            .with("zeta", "1")
            .with("alpha", "2")
            .with("mid", "3");

        let keys: Vec<&String> = bag.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_extend_last_writer_wins() {
        let mut base = PropertyBag::new().with("host", "a").with("port", 22);
        let overlay = PropertyBag::new().with("host", "b");

        base.extend(&overlay);

        assert_eq!(base.get("host").unwrap(), "b");
        assert_eq!(base.get("port").unwrap(), 22);
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_lookup_nested() {
        let mut bag = PropertyBag::new();
        bag.insert_bag(
            "artifact",
            PropertyBag::new().with("fileName", "lib-1.0.jar"),
        );

        assert_eq!(bag.lookup("artifact.fileName").unwrap(), "lib-1.0.jar");
        assert!(bag.lookup("artifact.missing").is_none());
        assert!(bag.lookup("nope.fileName").is_none());
    }

    #[test]
    fn test_lookup_literal_dotted_key_wins() {
        let mut bag = PropertyBag::new().with("a.b", "literal");
        bag.insert_bag("a", PropertyBag::new().with("b", "nested"));

        assert_eq!(bag.lookup("a.b").unwrap(), "literal");
    }

    #[test]
    fn test_lookup_through_scalar_is_none() {
        let bag = PropertyBag::new().with("a", "scalar");
        assert!(bag.lookup("a.b").is_none());
    }

    #[test]
    fn test_extend_strings() {
        let mut bag = PropertyBag::new().with("a", "1");
        let extra: std::collections::BTreeMap<String, String> =
            [("a".to_owned(), "2".to_owned()), ("b".to_owned(), "3".to_owned())]
                .into_iter()
                .collect();

        bag.extend_strings(&extra);

        assert_eq!(bag.get("a").unwrap(), "2");
        assert_eq!(bag.get("b").unwrap(), "3");
    }
}
