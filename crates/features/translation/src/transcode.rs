//! Flat `a.b.c` keys to nested objects and back.

use crate::error::{TranscodeError, TranscodeErrorExt};
use serde_json::{Map, Value};
use vitrine_domain::{ContentDocument, TranslationBundle};

/// Separator between key segments.
pub const SEPARATOR: char = '.';

/// Walks `tree` depth-first and emits one entry per string leaf, keyed by its dot-joined path.
///
/// Whenever this succeeds, [`unflatten`] of the result rebuilds `tree` exactly. An empty
/// root flattens to an empty bundle.
///
/// # Errors
/// * [`TranscodeError::ArrayNotSupported`] for any array below the root.
/// * [`TranscodeError::NullLeaf`] for `null` leaves.
/// * [`TranscodeError::NonStringLeaf`] for numbers and booleans.
/// * [`TranscodeError::EmptyObject`] for empty objects below the root.
/// * [`TranscodeError::InvalidSegment`] for object keys that are empty or contain `.`,
///   since they could not be split back apart.
///
/// ```rust
/// use vitrine_domain::ContentDocument;
/// use vitrine_translation::flatten;
///
/// let tree = ContentDocument::from_json(r#"{"home":{"hero":{"title":"Hi"}}}"#).unwrap();
/// let flat = flatten(&tree).unwrap();
/// assert_eq!(flat.get("home.hero.title"), Some("Hi"));
/// ```
pub fn flatten(tree: &ContentDocument) -> Result<TranslationBundle, TranscodeError> {
    let mut bundle = TranslationBundle::new();
    let Value::Object(root) = tree.as_value() else {
        return Ok(bundle);
    };
    let mut path = Vec::new();
    walk(root, &mut path, &mut bundle)?;
    Ok(bundle)
}

fn walk<'a>(
    node: &'a Map<String, Value>,
    path: &mut Vec<&'a str>,
    out: &mut TranslationBundle,
) -> Result<(), TranscodeError> {
    for (segment, value) in node {
        path.push(segment);
        if segment.is_empty() || segment.contains(SEPARATOR) {
            return Err(TranscodeError::InvalidSegment { key: path.join("."), context: None });
        }

        match value {
            Value::Object(child) if child.is_empty() => {
                return Err(TranscodeError::EmptyObject { path: path.join("."), context: None });
            },
            Value::Object(child) => walk(child, path, out)?,
            Value::Array(_) => {
                return Err(TranscodeError::ArrayNotSupported {
                    path: path.join("."),
                    context: None,
                });
            },
            Value::Null => {
                return Err(TranscodeError::NullLeaf { path: path.join("."), context: None });
            },
            Value::String(text) => {
                out.insert(path.join("."), text.as_str());
            },
            Value::Number(_) | Value::Bool(_) => {
                return Err(TranscodeError::NonStringLeaf {
                    path: path.join("."),
                    found: if value.is_boolean() { "a boolean".into() } else { "a number".into() },
                    context: None,
                });
            },
        }
        path.pop();
    }
    Ok(())
}

/// Rebuilds the nested tree described by `bundle`.
///
/// # Errors
/// * [`TranscodeError::InvalidSegment`] for empty keys or empty segments (`a..b`, `.a`, `a.`).
/// * [`TranscodeError::KeyConflict`] when one key is a strict prefix of another
///   (`a` and `a.b`), whichever order they arrive in.
/// * [`TranscodeError::Document`] when the nesting exceeds the document depth limit.
///
/// ```rust
/// use vitrine_domain::TranslationBundle;
/// use vitrine_translation::{TranscodeError, unflatten};
///
/// let bundle: TranslationBundle = [("a", "x"), ("a.b", "y")].into_iter().collect();
/// assert!(matches!(unflatten(&bundle), Err(TranscodeError::KeyConflict { .. })));
/// ```
pub fn unflatten(bundle: &TranslationBundle) -> Result<ContentDocument, TranscodeError> {
    let mut root = Map::new();

    for (key, text) in bundle {
        let segments = split_key(key)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(TranscodeError::InvalidSegment { key: key.clone(), context: None });
        };

        let mut node = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = node
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match slot {
                Value::Object(child) => child,
                _ => {
                    return Err(TranscodeError::KeyConflict {
                        key: key.clone(),
                        existing: parents[..=depth].join("."),
                        context: None,
                    });
                },
            };
        }

        if node.contains_key(*leaf) {
            let existing =
                bundle.keys().find(|other| is_child_key(key, other)).unwrap_or(key.as_str());
            return Err(TranscodeError::KeyConflict {
                key: key.clone(),
                existing: existing.to_owned(),
                context: None,
            });
        }
        node.insert((*leaf).to_owned(), Value::String(text.clone()));
    }

    ContentDocument::new(Value::Object(root)).context("Rebuilding nested translations")
}

/// Whether `candidate` lives strictly below `parent` (`a.b` below `a`, but not `ab`).
fn is_child_key(parent: &str, candidate: &str) -> bool {
    candidate
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

fn split_key(key: &str) -> Result<Vec<&str>, TranscodeError> {
    let segments: Vec<&str> = key.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TranscodeError::InvalidSegment { key: key.to_owned(), context: None });
    }
    Ok(segments)
}

/// Keys of `bundle` that are strict prefixes of other keys, paired with one colliding key.
///
/// Useful for reporting every conflict at once instead of failing on the first.
#[must_use]
pub fn conflicts(bundle: &TranslationBundle) -> Vec<(String, String)> {
    let keys: Vec<&str> = bundle.keys().collect();
    let mut found = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        // Sorted order puts every `key.*` entry after `key`, though not necessarily adjacent.
        if let Some(other) = keys[i + 1..]
            .iter()
            .take_while(|other| other.starts_with(key))
            .find(|other| is_child_key(key, other))
        {
            found.push(((*key).to_owned(), (*other).to_owned()));
        }
    }
    found
}
