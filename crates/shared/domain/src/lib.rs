//! # Domain Models
//!
//! Pure content types shared by every Vitrine crate: languages, content domains,
//! documents, translation bundles, cache tiers, typed page shapes and configuration.
//! Keep it lean: no I/O or networking here, just data and validation helpers.

pub mod config;
pub mod document;
pub mod domain;
mod error;
pub mod language;
pub mod pages;
pub mod tier;

pub use document::{ContentDocument, MAX_DOCUMENT_DEPTH, TranslationBundle};
pub use domain::{ContentDomain, KnownDomain};
pub use error::{DomainError, DomainErrorExt};
pub use language::LanguageCode;
pub use tier::CacheTier;
