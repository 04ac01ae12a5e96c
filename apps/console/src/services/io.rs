//! File and terminal plumbing shared by the handlers.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;
use vitrine::content::SaveError;
use vitrine::domain::ContentDocument;

/// Reads `path`, or stdin when `path` is `-`.
///
/// # Errors
/// Returns an error if the input cannot be read.
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads and parses a content document.
///
/// # Errors
/// Returns an error if the input cannot be read or is not a JSON object.
pub fn read_document(path: &Path) -> Result<ContentDocument> {
    let text = read_text(path)?;
    ContentDocument::from_json(&text)
        .with_context(|| format!("{} is not a content document", path.display()))
}

/// Pretty-prints `value` followed by a newline.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_json(out: &mut impl Write, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Turns a save failure into a console error carrying its remediation hint.
pub fn explain(err: SaveError) -> anyhow::Error {
    match err.advice() {
        Some(hint) => anyhow!("{err}\n  hint: {hint}"),
        None => anyhow!(err),
    }
}
