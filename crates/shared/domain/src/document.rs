use crate::error::{DomainError, DomainErrorExt};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Deepest nesting accepted for a single document.
pub const MAX_DOCUMENT_DEPTH: usize = 64;

/// One domain's content in one language: a plain JSON object tree.
///
/// Construction enforces the invariants every tier relies on: the root is an object and
/// nesting stays within [`MAX_DOCUMENT_DEPTH`]. The value is treated as immutable once
/// resolved; callers replace documents instead of mutating them in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContentDocument(Value);

impl ContentDocument {
    /// # Errors
    /// Returns [`DomainError::MalformedDocument`] if the root is not an object or the
    /// tree is nested too deeply.
    pub fn new(value: Value) -> Result<Self, DomainError> {
        if !value.is_object() {
            return Err(DomainError::MalformedDocument {
                message: format!("expected an object root, found {}", kind_of(&value)).into(),
                context: None,
            });
        }
        check_depth(&value)?;
        Ok(Self(value))
    }

    /// An empty object document.
    #[must_use]
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// # Errors
    /// Returns [`DomainError::Json`] for invalid JSON and
    /// [`DomainError::MalformedDocument`] for a non-object root.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text).context("Parsing content document")?;
        Self::new(value)
    }

    /// Compact JSON, the wire and cache representation.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a nested value by a dot-separated path (`hero.title`).
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.0, |node, segment| node.as_object()?.get(segment))
    }

    /// Looks up a string leaf by a dot-separated path.
    #[must_use]
    pub fn text(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_object().is_none_or(Map::is_empty)
    }
}

impl TryFrom<Value> for ContentDocument {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, DomainError> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ContentDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

fn check_depth(root: &Value) -> Result<(), DomainError> {
    let mut stack = vec![(root, 1usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_DOCUMENT_DEPTH {
            return Err(DomainError::MalformedDocument {
                message: format!("nesting exceeds {MAX_DOCUMENT_DEPTH} levels").into(),
                context: None,
            });
        }
        match node {
            Value::Object(map) => stack.extend(map.values().map(|child| (child, depth + 1))),
            Value::Array(items) => stack.extend(items.iter().map(|child| (child, depth + 1))),
            _ => {},
        }
    }
    Ok(())
}

pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flat translation table: dot-separated keys mapped to leaf strings.
///
/// This is the only shape exposed for bulk editing. Keys are kept sorted so exports are
/// stable and diffs stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationBundle(BTreeMap<String, String>);

impl TranslationBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl From<BTreeMap<String, String>> for TranslationBundle {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for TranslationBundle {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TranslationBundle {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
