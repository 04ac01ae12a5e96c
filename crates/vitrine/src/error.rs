use std::borrow::Cow;
use vitrine_database::RemoteError;
use vitrine_storage::StorageError;

/// Failures while assembling a [`ContentService`](crate::ContentService).
#[vitrine_derive::vitrine_error]
pub enum InitError {
    #[error("Local cache unavailable{}: {source}", format_context(.context))]
    #[hint("Check cache.dir permissions or switch cache.backend to \"memory\"")]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Remote store unavailable{}: {source}", format_context(.context))]
    #[hint("Check remote.url and credentials, or pass --offline")]
    Remote { source: RemoteError, context: Option<Cow<'static, str>> },
}
