use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

const MAX_DOMAIN_LEN: usize = 64;

/// Content buckets the site ships with a typed shape and compiled-in defaults for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum KnownDomain {
    Homepage,
    BusinessPage,
    SupportPage,
    News,
    Projects,
    Translations,
}

impl KnownDomain {
    pub const ALL: [Self; 6] = [
        Self::Homepage,
        Self::BusinessPage,
        Self::SupportPage,
        Self::News,
        Self::Projects,
        Self::Translations,
    ];

    #[must_use]
    pub fn domain(self) -> ContentDomain {
        ContentDomain(Arc::from(<&'static str>::from(self)))
    }
}

/// Name of a logical content bucket (`homepage`, `business-page`, ...).
///
/// Names are lowercased and restricted to ASCII alphanumerics, `-` and `_` so they can be
/// used verbatim as cache keys and remote collection names. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDomain(Arc<str>);

impl ContentDomain {
    /// # Errors
    /// Returns [`DomainError::InvalidDomain`] if the name is empty, too long or
    /// contains characters outside `[a-z0-9_-]`.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let name = name.trim().to_ascii_lowercase();

        if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
            return Err(DomainError::InvalidDomain {
                message: name.into(),
                context: Some(format!("Length must be 1..={MAX_DOMAIN_LEN}").into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(DomainError::InvalidDomain {
                message: name.into(),
                context: Some("Domain contains illegal characters".into()),
            });
        }

        Ok(Self(Arc::from(name)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the built-in bucket this name refers to, if any.
    #[must_use]
    pub fn known(&self) -> Option<KnownDomain> {
        self.0.parse().ok()
    }
}

impl From<KnownDomain> for ContentDomain {
    fn from(value: KnownDomain) -> Self {
        value.domain()
    }
}

impl TryFrom<&str> for ContentDomain {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, DomainError> {
        Self::new(value)
    }
}

impl TryFrom<String> for ContentDomain {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, DomainError> {
        Self::new(&value)
    }
}

impl From<ContentDomain> for String {
    fn from(value: ContentDomain) -> Self {
        value.0.as_ref().to_owned()
    }
}

impl AsRef<str> for ContentDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
