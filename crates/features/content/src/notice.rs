use chrono::{DateTime, Utc};
use strum_macros::{AsRefStr, Display};
use vitrine_domain::{ContentDomain, LanguageCode};
use vitrine_event_bus::{Notice, NotificationBus};

/// The bus content notices travel on.
pub type ContentBus = NotificationBus<ContentChanged>;

/// What caused a [`ContentChanged`] notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ChangeOrigin {
    /// Accepted by the remote store and mirrored locally.
    Saved,
    /// Written to the local cache only.
    LocalOnly,
    /// Replaced by the compiled-in default.
    Reset,
    Preview,
    PreviewCleared,
}

/// "Re-resolve now" signal for views showing `(domain, language)`.
///
/// Notices are routed by domain; views interested in a single language filter on
/// [`ContentChanged::language`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChanged {
    pub domain: ContentDomain,
    pub language: LanguageCode,
    pub origin: ChangeOrigin,
    pub at: DateTime<Utc>,
}

impl ContentChanged {
    #[must_use]
    pub fn new(domain: ContentDomain, language: LanguageCode, origin: ChangeOrigin) -> Self {
        Self { domain, language, origin, at: Utc::now() }
    }

    /// Whether a view rendering `(domain, language)` should re-resolve.
    #[must_use]
    pub fn concerns(&self, domain: &ContentDomain, language: LanguageCode) -> bool {
        self.domain == *domain && self.language == language
    }
}

impl Notice for ContentChanged {
    type Topic = ContentDomain;

    fn topic(&self) -> ContentDomain {
        self.domain.clone()
    }
}
