use anyhow::Result;
use std::io::Write;
use vitrine::ContentService;

/// Prints every cached `(domain, language)` pair.
///
/// # Errors
/// Returns an error if the cache cannot be listed or the output cannot be written.
pub fn list(service: &ContentService, out: &mut impl Write) -> Result<()> {
    let entries = service.local.entries()?;
    if entries.is_empty() {
        writeln!(out, "ℹ️ The local cache is empty")?;
        return Ok(());
    }
    for (domain, lang) in &entries {
        writeln!(out, "{domain}\t{lang}")?;
    }
    Ok(())
}

/// Drops every entry under the configured prefix.
///
/// # Errors
/// Returns an error if an entry cannot be removed.
pub fn clear(service: &ContentService, out: &mut impl Write) -> Result<()> {
    let removed = service.local.clear()?;
    writeln!(out, "✅ Removed {removed} cached entries")?;
    Ok(())
}

/// Prints bytes used against the quota.
///
/// # Errors
/// Returns an error if the cache size cannot be computed.
#[allow(clippy::cast_precision_loss)]
pub fn usage(service: &ContentService, out: &mut impl Write) -> Result<()> {
    let usage = service.local.usage()?;
    let percent =
        if usage.quota == 0 { 100.0 } else { usage.used as f64 * 100.0 / usage.quota as f64 };
    writeln!(
        out,
        "{} / {} bytes ({percent:.1}%), {} bytes free",
        usage.used,
        usage.quota,
        usage.remaining()
    )?;
    Ok(())
}
