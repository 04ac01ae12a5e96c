use std::borrow::Cow;
use vitrine_domain::DomainError;
use vitrine_translation::TranscodeError;

/// A document does not match the shape registered for its domain.
#[vitrine_derive::vitrine_error]
pub enum SchemaError {
    #[error("Unknown content domain{}: {message}", format_context(.context))]
    #[hint("Use one of the built-in domains or set sync.strict_schemas = false")]
    UnknownDomain { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Field names or types differ from the domain's shape.
    #[error("Document does not match its shape{}: {message}", format_context(.context))]
    #[hint("Compare the document with `vitrine resolve` output for the same domain")]
    Shape { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid translation tree{}: {source}", format_context(.context))]
    Translations { source: TranscodeError, context: Option<Cow<'static, str>> },

    #[error("Invalid document{}: {source}", format_context(.context))]
    Document { source: DomainError, context: Option<Cow<'static, str>> },
}
