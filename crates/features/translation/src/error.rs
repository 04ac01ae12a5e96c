use std::borrow::Cow;
use vitrine_domain::DomainError;

/// Failures while converting between flat bundles and nested documents.
#[vitrine_derive::vitrine_error]
pub enum TranscodeError {
    /// Two keys need the same path to be both a leaf and a branch.
    #[error("Key conflict{}: `{key}` collides with `{existing}`", format_context(.context))]
    #[hint("A key cannot hold text and also have sub-keys; rename one of them")]
    KeyConflict { key: String, existing: String, context: Option<Cow<'static, str>> },

    /// Arrays have no flat-key representation.
    #[error("Array at `{path}` cannot be flattened{}", format_context(.context))]
    ArrayNotSupported { path: String, context: Option<Cow<'static, str>> },

    /// `null` leaves have no string representation.
    #[error("Null value at `{path}`{}", format_context(.context))]
    NullLeaf { path: String, context: Option<Cow<'static, str>> },

    /// Numbers and booleans would come back from a bundle as strings.
    #[error("Value at `{path}` must be a string, found {found}{}", format_context(.context))]
    #[hint("Translation values are text; quote numbers and booleans")]
    NonStringLeaf { path: String, found: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An empty object has no flat-key representation and would be lost.
    #[error("Empty object at `{path}` cannot be flattened{}", format_context(.context))]
    EmptyObject { path: String, context: Option<Cow<'static, str>> },

    /// An imported bundle names the same key twice.
    #[error("Duplicate key `{key}`{}", format_context(.context))]
    #[hint("Each key may appear once per bundle file; merge the duplicate entries")]
    DuplicateKey { key: String, context: Option<Cow<'static, str>> },

    /// A key segment is empty or contains the `.` separator.
    #[error("Invalid key segment in `{key}`{}", format_context(.context))]
    #[hint("Keys are dot-separated names; remove empty segments such as `a..b` or a trailing `.`")]
    InvalidSegment { key: String, context: Option<Cow<'static, str>> },

    /// An imported bundle value is not a string.
    #[error("Value for `{key}` must be a string, found {found}{}", format_context(.context))]
    InvalidValue { key: String, found: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Bundle JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Nested document rejected{}: {source}", format_context(.context))]
    Document { source: DomainError, context: Option<Cow<'static, str>> },
}
