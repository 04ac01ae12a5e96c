use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[vitrine_derive::vitrine_error]
pub enum StorageError {
    #[error("Local cache quota exceeded{}: {message}", format_context(.context))]
    #[hint("Clear stale entries with `vitrine cache clear` or raise cache.quota_bytes")]
    Quota { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid cache key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Corrupt cache entry{}: {message}", format_context(.context))]
    Corrupt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    #[hint("Check that the cache directory exists and is writable")]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },

    #[error("Serialization failure{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
