//! Flat JSON import/export, the only bulk-editing format for translations.

use crate::error::{TranscodeError, TranscodeErrorExt};
use crate::transcode::unflatten;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;
use vitrine_domain::TranslationBundle;

/// What an edited bundle changes relative to a base one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleDiff {
    /// Keys only in the edited bundle, with their new values.
    pub added: Vec<(String, String)>,
    /// Keys only in the base bundle.
    pub removed: Vec<String>,
    /// Keys in both whose values differ: `(key, before, after)`.
    pub changed: Vec<(String, String, String)>,
}

impl BundleDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Serializes `bundle` as a pretty-printed flat JSON object with sorted keys.
#[must_use]
pub fn export_json(bundle: &TranslationBundle) -> String {
    let object: Map<String, Value> =
        bundle.iter().map(|(k, v)| (k.to_owned(), Value::String(v.to_owned()))).collect();
    // A map of strings always serializes.
    serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default()
}

/// Parses a flat JSON object of string values.
///
/// The result is checked with [`unflatten`] before it is returned, so a bundle with
/// colliding or repeated keys is rejected as a whole instead of silently dropping entries.
///
/// # Errors
/// * [`TranscodeError::Json`] for malformed JSON.
/// * [`TranscodeError::InvalidValue`] when the root or any value is not what a flat bundle
///   allows; the offending key is named.
/// * [`TranscodeError::DuplicateKey`] when a key appears more than once.
/// * Any [`unflatten`] error.
///
/// ```rust
/// use vitrine_translation::import_json;
///
/// let bundle = import_json(r#"{"nav.home":"Home","nav.about":"About"}"#).unwrap();
/// assert_eq!(bundle.len(), 2);
/// assert!(import_json(r#"{"nav":"x","nav.home":"y"}"#).is_err());
/// assert!(import_json(r#"{"nav.home":"Home","nav.home":"Start"}"#).is_err());
/// ```
pub fn import_json(text: &str) -> Result<TranslationBundle, TranscodeError> {
    let Members(members) = match serde_json::from_str::<Members>(text) {
        Ok(members) => members,
        Err(err) => {
            // Valid JSON that is not an object gets a clearer error than serde's.
            return Err(match serde_json::from_str::<Value>(text) {
                Ok(value) => TranscodeError::InvalidValue {
                    key: String::new(),
                    found: kind_of(&value),
                    context: Some("Bundle root must be a flat object".into()),
                },
                Err(_) => TranscodeError::Json {
                    source: err,
                    context: Some("Parsing translation bundle".into()),
                },
            });
        },
    };

    let mut bundle = TranslationBundle::new();
    for (key, value) in members {
        let Value::String(translated) = value else {
            return Err(TranscodeError::InvalidValue {
                key,
                found: kind_of(&value),
                context: None,
            });
        };
        if bundle.contains_key(&key) {
            return Err(TranscodeError::DuplicateKey { key, context: None });
        }
        bundle.insert(key, translated);
    }

    unflatten(&bundle).context("Validating imported keys")?;
    debug!(keys = bundle.len(), "Imported translation bundle");
    Ok(bundle)
}

/// Members of a JSON object in document order, repeated keys included.
struct Members(Vec<(String, Value)>);

struct MembersVisitor;

impl<'de> Visitor<'de> for MembersVisitor {
    type Value = Members;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Members, A::Error> {
        let mut members = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(member) = access.next_entry::<String, Value>()? {
            members.push(member);
        }
        Ok(Members(members))
    }
}

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MembersVisitor)
    }
}

/// Compares two bundles key by key.
#[must_use]
pub fn diff(base: &TranslationBundle, edited: &TranslationBundle) -> BundleDiff {
    let mut out = BundleDiff::default();
    for (key, before) in base.iter() {
        match edited.get(key) {
            None => out.removed.push(key.to_owned()),
            Some(after) if after != before => {
                out.changed.push((key.to_owned(), before.to_owned(), after.to_owned()));
            },
            Some(_) => {},
        }
    }
    out.added = edited
        .iter()
        .filter(|(key, _)| !base.contains_key(key))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    out
}

/// Keys present in `reference` but absent from `candidate`, in sorted order.
///
/// Used for translation coverage: pass the default-language bundle as the reference.
#[must_use]
pub fn missing_keys(reference: &TranslationBundle, candidate: &TranslationBundle) -> Vec<String> {
    reference.keys().filter(|key| !candidate.contains_key(key)).map(str::to_owned).collect()
}

const fn kind_of(value: &Value) -> Cow<'static, str> {
    Cow::Borrowed(match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    })
}
