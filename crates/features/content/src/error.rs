use crate::schema::SchemaError;
use std::borrow::Cow;
use vitrine_database::RemoteError;
use vitrine_storage::StorageError;
use vitrine_translation::TranscodeError;

/// Why a save was refused. The caller's draft is never touched, so the admin can retry.
#[vitrine_derive::vitrine_error]
pub enum SaveError {
    /// The document failed validation; nothing was written anywhere.
    #[error("Invalid content{}: {source}", format_context(.context))]
    Invalid { source: SchemaError, context: Option<Cow<'static, str>> },

    /// The document would not fit in the local cache; the remote store was not contacted.
    #[error("Local cache quota exceeded{}: {message}", format_context(.context))]
    #[hint("Shrink the document or free space with `vitrine cache clear`")]
    Quota { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The remote write failed; the local cache was left unchanged.
    #[error("Remote save failed{}: {source}", format_context(.context))]
    Remote { source: RemoteError, context: Option<Cow<'static, str>> },

    /// The remote write succeeded but mirroring it into the local cache did not.
    #[error("Local mirror failed{}: {source}", format_context(.context))]
    Local { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Translation bundle rejected{}: {source}", format_context(.context))]
    Transcode { source: TranscodeError, context: Option<Cow<'static, str>> },
}

impl SaveError {
    /// Admin-facing advice for this failure, falling back to the wrapped error's hint.
    #[must_use]
    pub const fn advice(&self) -> Option<&'static str> {
        if let Some(hint) = self.hint() {
            return Some(hint);
        }
        match self {
            Self::Invalid { source, .. } => source.hint(),
            Self::Remote { source, .. } => source.hint(),
            Self::Local { source, .. } => source.hint(),
            Self::Transcode { source, .. } => source.hint(),
            Self::Quota { .. } => None,
        }
    }

    /// Routes quota rejections to [`SaveError::Quota`], everything else to [`SaveError::Local`].
    pub(crate) fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::Quota { message, .. } => Self::Quota { message, context: None },
            other => Self::Local { source: other, context: None },
        }
    }
}
