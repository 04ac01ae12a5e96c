//! # Translations
//!
//! Converts translation data between the flat shape admins edit (`"home.hero.title" -> "..."`)
//! and the nested shape pages look values up in.
//!
//! * [`flatten`] / [`unflatten`] are pure and mutual inverses for trees whose leaves are
//!   strings and whose objects are non-empty.
//! * A key that would have to be both a leaf and a branch is a [`TranscodeError::KeyConflict`];
//!   nothing is ever silently overwritten.
//! * [`import_json`] / [`export_json`] move bundles in and out as flat JSON files, and
//!   [`diff`] / [`missing_keys`] support review and coverage reports.

mod bundle;
mod error;
mod transcode;

pub use bundle::{BundleDiff, diff, export_json, import_json, missing_keys};
pub use error::{TranscodeError, TranscodeErrorExt};
pub use transcode::{SEPARATOR, conflicts, flatten, unflatten};
