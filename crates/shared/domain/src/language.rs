use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Languages the site is published in.
///
/// [`LanguageCode::Ko`] is the default language: when a language-specific default
/// document is missing, the Korean one is served instead.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LanguageCode {
    #[default]
    Ko,
    En,
    Zh,
    Ja,
}

impl LanguageCode {
    /// The fallback language for compiled-in defaults.
    pub const DEFAULT: Self = Self::Ko;

    /// Every supported language, in presentation order.
    pub const ALL: [Self; 4] = [Self::Ko, Self::En, Self::Zh, Self::Ja];

    /// Canonical two-letter code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ja => "ja",
        }
    }

    /// Parses a language tag, tolerating case and region suffixes (`en-US`, `zh_CN`).
    ///
    /// # Errors
    /// Returns [`DomainError::UnsupportedLanguage`] for empty or unknown tags.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let primary = value.trim().split(['-', '_']).next().unwrap_or_default();
        primary.parse::<Self>().map_err(|_: strum::ParseError| DomainError::UnsupportedLanguage {
            message: value.to_owned().into(),
            context: None,
        })
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Ko)
    }
}
