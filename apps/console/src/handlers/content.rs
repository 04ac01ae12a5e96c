use crate::services::io::{explain, read_document, write_json};
use anyhow::Result;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use vitrine::ContentService;
use vitrine::domain::{ContentDomain, LanguageCode};

/// Prints the effective document, optionally wrapped with the tier that served it.
///
/// # Errors
/// Returns an error if writing the output fails. Resolving itself never fails.
pub async fn resolve(
    service: &ContentService,
    out: &mut impl Write,
    domain: &ContentDomain,
    lang: LanguageCode,
    explain_tier: bool,
) -> Result<()> {
    let resolution = service.resolver.resolve_traced(domain, lang).await;
    if explain_tier {
        write_json(
            out,
            &json!({
                "tier": resolution.tier,
                "servedLanguage": resolution.served_language,
                "document": resolution.document,
            }),
        )
    } else {
        write_json(out, resolution.document.as_value())
    }
}

/// Publishes the document in `file`.
///
/// # Errors
/// Returns an error if the file is unreadable or the save is refused.
pub async fn save(
    service: &ContentService,
    out: &mut impl Write,
    domain: &ContentDomain,
    lang: LanguageCode,
    file: &Path,
    attempts: Option<u32>,
    local_only: bool,
) -> Result<()> {
    let doc = read_document(file)?;

    if local_only {
        service.sync.save_local_only(domain, lang, &doc).map_err(explain)?;
        writeln!(out, "⚠️ Saved {domain} ({lang}) to the local cache only")?;
        return Ok(());
    }

    let saved = match attempts {
        Some(n) => {
            let retry = service.sync.retry_policy().with_max_attempts(n);
            service.sync.save_with(domain, lang, &doc, &retry).await
        },
        None => service.sync.save(domain, lang, &doc).await,
    };
    saved.map_err(explain)?;

    writeln!(out, "✅ Saved {domain} ({lang})")?;
    Ok(())
}

/// Restores the compiled-in default and prints it.
///
/// # Errors
/// Returns an error if the save is refused.
pub async fn reset(
    service: &ContentService,
    out: &mut impl Write,
    domain: &ContentDomain,
    lang: LanguageCode,
) -> Result<()> {
    let restored = service.sync.reset(domain, lang).await.map_err(explain)?;
    writeln!(out, "✅ Reset {domain} ({lang}) to its default")?;
    write_json(out, restored.as_value())
}

/// Validates a draft, overlays it and prints what readers would see.
///
/// The overlay lives only as long as this process.
///
/// # Errors
/// Returns an error if the draft is unreadable or does not match the domain's shape.
pub async fn preview(
    service: &ContentService,
    out: &mut impl Write,
    domain: &ContentDomain,
    lang: LanguageCode,
    file: &Path,
) -> Result<()> {
    let draft = read_document(file)?;
    service.schemas.validate(domain, &draft)?;
    service.preview.set(domain, draft);

    let shown = service.resolver.resolve_traced(domain, lang).await;
    write_json(out, &json!({ "tier": shown.tier, "document": shown.document }))?;

    service.preview.clear(domain);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use vitrine::domain::KnownDomain;
    use vitrine::domain::config::VitrineConfig;

    fn service() -> ContentService {
        ContentService::offline(&VitrineConfig::default()).unwrap()
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn resolve_explains_the_default_tier() {
        let service = service();
        let mut buf = Vec::new();
        resolve(&service, &mut buf, &KnownDomain::SupportPage.domain(), LanguageCode::Ja, true)
            .await
            .unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(printed["tier"], "default");
        assert_eq!(printed["servedLanguage"], "ko");
    }

    #[tokio::test]
    async fn save_then_resolve_from_file() {
        let service = service();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("news.json");
        fs::write(&file, r#"{"items":[]}"#).unwrap();
        let news = KnownDomain::News.domain();

        let mut buf = Vec::new();
        save(&service, &mut buf, &news, LanguageCode::En, &file, Some(2), false).await.unwrap();
        assert!(output(buf).contains("Saved news (en)"));

        let mut buf = Vec::new();
        resolve(&service, &mut buf, &news, LanguageCode::En, false).await.unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(printed, serde_json::json!({ "items": [] }));
    }

    #[tokio::test]
    async fn refused_saves_carry_a_hint() {
        let service = service();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        fs::write(&file, r#"{"posts":[]}"#).unwrap();

        let news = KnownDomain::News.domain();
        let err = save(&service, &mut Vec::new(), &news, LanguageCode::Ko, &file, None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("hint:"));
    }

    #[tokio::test]
    async fn preview_shows_the_draft_then_clears_it() {
        let service = service();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("draft.json");
        fs::write(&file, r#"{"items":[]}"#).unwrap();
        let projects = KnownDomain::Projects.domain();

        let mut buf = Vec::new();
        preview(&service, &mut buf, &projects, LanguageCode::Zh, &file).await.unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(printed["tier"], "preview");
        assert!(!service.preview.is_active(&projects));
    }
}
