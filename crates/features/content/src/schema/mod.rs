//! Per-domain shape validation applied at every read and write boundary.

mod error;

pub use error::{SchemaError, SchemaErrorExt};

use fxhash::FxHashMap;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use vitrine_domain::pages::{
    BusinessPageContent, HomepageContent, NewsContent, ProjectsContent, SupportPageContent,
};
use vitrine_domain::{ContentDocument, ContentDomain, KnownDomain};

/// Validator for a single domain.
pub type ShapeCheck = fn(&ContentDocument) -> Result<(), SchemaError>;

#[derive(Clone)]
struct RegistryInner {
    strict: bool,
    shapes: FxHashMap<ContentDomain, ShapeCheck>,
}

/// Maps content domains to the shape their documents must have.
///
/// The built-in domains are always registered. With `strict` set, documents for any other
/// domain are rejected; otherwise they pass through as long as they are plain trees.
#[derive(Clone)]
pub struct SchemaRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut domains: Vec<_> = self.inner.shapes.keys().map(ContentDomain::as_str).collect();
        domains.sort_unstable();
        f.debug_struct("SchemaRegistry")
            .field("strict", &self.inner.strict)
            .field("domains", &domains)
            .finish()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SchemaRegistry {
    /// Registry with every built-in domain shape.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        let mut shapes: FxHashMap<ContentDomain, ShapeCheck> = FxHashMap::default();
        for known in KnownDomain::ALL {
            shapes.insert(known.domain(), builtin_check(known));
        }
        Self { inner: Arc::new(RegistryInner { strict, shapes }) }
    }

    /// Adds or replaces the check for `domain`.
    #[must_use]
    pub fn with_shape(mut self, domain: ContentDomain, check: ShapeCheck) -> Self {
        Arc::make_mut(&mut self.inner).shapes.insert(domain, check);
        self
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.inner.strict
    }

    #[must_use]
    pub fn is_registered(&self, domain: &ContentDomain) -> bool {
        self.inner.shapes.contains_key(domain)
    }

    /// Checks `doc` against the shape registered for `domain`.
    ///
    /// # Errors
    /// * [`SchemaError::UnknownDomain`] for unregistered domains in strict mode.
    /// * [`SchemaError::Shape`] or [`SchemaError::Translations`] when the document does not
    ///   match.
    pub fn validate(&self, domain: &ContentDomain, doc: &ContentDocument) -> Result<(), SchemaError> {
        match self.inner.shapes.get(domain) {
            Some(check) => check(doc).context(domain.to_string()),
            None if self.inner.strict => Err(SchemaError::UnknownDomain {
                message: domain.to_string().into(),
                context: None,
            }),
            None => Ok(()),
        }
    }
}

/// Accepts documents that deserialize into `T`.
///
/// # Errors
/// [`SchemaError::Shape`] with the deserializer's message.
pub fn typed_shape<T: DeserializeOwned>(doc: &ContentDocument) -> Result<(), SchemaError> {
    T::deserialize(doc.as_value()).map(drop).map_err(|err| SchemaError::Shape {
        message: err.to_string().into(),
        context: None,
    })
}

/// Accepts nested translation trees: string leaves under non-empty objects only.
///
/// # Errors
/// [`SchemaError::Translations`] when the tree could not be flattened.
pub fn translation_shape(doc: &ContentDocument) -> Result<(), SchemaError> {
    vitrine_translation::flatten(doc)?;
    Ok(())
}

const fn builtin_check(domain: KnownDomain) -> ShapeCheck {
    match domain {
        KnownDomain::Homepage => typed_shape::<HomepageContent>,
        KnownDomain::BusinessPage => typed_shape::<BusinessPageContent>,
        KnownDomain::SupportPage => typed_shape::<SupportPageContent>,
        KnownDomain::News => typed_shape::<NewsContent>,
        KnownDomain::Projects => typed_shape::<ProjectsContent>,
        KnownDomain::Translations => translation_shape,
    }
}
