#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Vitrine infrastructure and feature crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! vitrine-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field, enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` if an
///   `Internal` variant is present.
/// * **Operator Hints**: Variants annotated with `#[hint("...")]` expose that text through
///   a generated `hint()` method. Admin-facing surfaces print it next to the error.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants with a `source` field must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[vitrine_derive::vitrine_error]
/// pub enum CacheError {
///     #[error("Quota exceeded{}: {message}", format_context(.context))]
///     #[hint("Shrink the document or clear the local cache")]
///     Quota { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("IO failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<Vec<u8>, CacheError> {
///     std::fs::read("cache.bin").context("Reading cache file")
/// }
/// ```
#[proc_macro_attribute]
pub fn vitrine_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
