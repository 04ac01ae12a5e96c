use std::borrow::Cow;

/// A specialized [`RemoteError`] enum of this crate.
#[vitrine_derive::vitrine_error]
pub enum RemoteError {
    /// Builder parameters are missing or malformed.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The store could not be reached or refused the operation. Safe to retry.
    #[error("Remote store unavailable{}: {message}", format_context(.context))]
    #[hint("Check network connectivity and remote.url; your draft has been kept")]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A stored body could not be decoded into a document.
    #[error("Corrupt remote document{}: {message}", format_context(.context))]
    Corrupt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors raised while bootstrapping.
    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },
}

impl RemoteError {
    /// Whether a retry policy may attempt the operation again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub(crate) fn unavailable(err: impl std::fmt::Display, context: impl Into<Cow<'static, str>>) -> Self {
        Self::Unavailable { message: err.to_string().into(), context: Some(context.into()) }
    }
}
