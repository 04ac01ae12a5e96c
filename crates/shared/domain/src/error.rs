use std::borrow::Cow;

/// Validation failures raised while constructing domain values.
#[vitrine_derive::vitrine_error]
pub enum DomainError {
    #[error("Invalid content domain{}: {message}", format_context(.context))]
    InvalidDomain { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported language{}: {message}", format_context(.context))]
    #[hint("Use one of: ko, en, zh, ja")]
    UnsupportedLanguage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The value is not a plain JSON object tree.
    #[error("Malformed content document{}: {message}", format_context(.context))]
    MalformedDocument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
