use crate::services::io::{explain, read_text};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use vitrine::ContentService;
use vitrine::domain::{KnownDomain, LanguageCode, TranslationBundle};
use vitrine::translation::{diff, export_json, flatten, import_json, missing_keys};

async fn current_bundle(service: &ContentService, lang: LanguageCode) -> Result<TranslationBundle> {
    let tree = service.resolver.resolve(&KnownDomain::Translations.domain(), lang).await;
    flatten(&tree).with_context(|| format!("Stored {lang} translations cannot be flattened"))
}

/// Writes the flat bundle for `lang` to `out_file`, or to `out` when no file is given.
///
/// # Errors
/// Returns an error if the stored tree cannot be flattened or the output cannot be written.
pub async fn export(
    service: &ContentService,
    out: &mut impl Write,
    lang: LanguageCode,
    out_file: Option<&Path>,
) -> Result<()> {
    let bundle = current_bundle(service, lang).await?;
    let text = export_json(&bundle);

    match out_file {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(out, "✅ Exported {} {lang} keys to {}", bundle.len(), path.display())?;
        },
        None => writeln!(out, "{text}")?,
    }
    Ok(())
}

/// Shows the changes a bundle file would make and, unless `dry_run`, saves it.
///
/// # Errors
/// Returns an error if the file is not a valid flat bundle (including conflicting keys) or
/// the save is refused.
pub async fn import(
    service: &ContentService,
    out: &mut impl Write,
    lang: LanguageCode,
    file: &Path,
    dry_run: bool,
) -> Result<()> {
    let edited = import_json(&read_text(file)?)
        .with_context(|| format!("{} is not a valid translation bundle", file.display()))?;
    let current = current_bundle(service, lang).await?;
    let changes = diff(&current, &edited);

    for (key, value) in &changes.added {
        writeln!(out, "+ {key} = {value:?}")?;
    }
    for key in &changes.removed {
        writeln!(out, "- {key}")?;
    }
    for (key, before, after) in &changes.changed {
        writeln!(out, "~ {key}: {before:?} -> {after:?}")?;
    }

    if changes.is_empty() {
        writeln!(out, "ℹ️ No changes for {lang}")?;
        return Ok(());
    }
    if dry_run {
        writeln!(out, "ℹ️ Dry run: nothing saved")?;
        return Ok(());
    }

    service.sync.save_translations(lang, &edited).await.map_err(explain)?;
    writeln!(
        out,
        "✅ Imported {lang}: {} added, {} removed, {} changed",
        changes.added.len(),
        changes.removed.len(),
        changes.changed.len()
    )?;
    Ok(())
}

/// Lists keys of `reference` that `lang` lacks.
///
/// # Errors
/// Returns an error if either stored tree cannot be flattened.
pub async fn missing(
    service: &ContentService,
    out: &mut impl Write,
    lang: LanguageCode,
    reference: LanguageCode,
) -> Result<()> {
    let reference_bundle = current_bundle(service, reference).await?;
    let candidate = current_bundle(service, lang).await?;
    let absent = missing_keys(&reference_bundle, &candidate);

    if absent.is_empty() {
        writeln!(out, "✅ {lang} covers every {reference} key")?;
        return Ok(());
    }
    for key in &absent {
        writeln!(out, "{key}")?;
    }
    writeln!(
        out,
        "⚠️ {} of {} {reference} keys missing in {lang}",
        absent.len(),
        reference_bundle.len()
    )?;
    Ok(())
}
