pub mod fixtures;

use fixtures::*;
use serde_json::json;
use std::time::Duration;
use vitrine_content::*;
use vitrine_database::{RemoteContentStore, RemoteError};
use vitrine_domain::{
    CacheTier, ContentDocument, ContentDomain, KnownDomain, LanguageCode, TranslationBundle,
};
use vitrine_event_bus::EventReceiverExt;

#[tokio::test]
async fn save_writes_through_and_notifies() {
    let h = Harness::new();
    let domain = KnownDomain::Homepage.domain();
    let d = homepage("Saved title");

    h.sync.save(&domain, LanguageCode::Ko, &d).await.unwrap();

    assert_eq!(h.remote.stored(domain.as_str(), "ko"), Some(d.clone()));
    assert_eq!(h.remote.writes(), 1);

    let resolved = h.resolver.resolve_traced(&domain, LanguageCode::Ko).await;
    assert_eq!(resolved.tier, CacheTier::Local);
    assert_eq!(resolved.document, d);
    assert_eq!(h.remote.reads(), 0, "no remote call needed after a save");

    let notices = h.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].concerns(&domain, LanguageCode::Ko));
    assert_eq!(notices[0].origin, ChangeOrigin::Saved);
}

#[tokio::test]
async fn remote_failure_leaves_local_untouched() {
    let h = Harness::new();
    let domain = KnownDomain::Homepage.domain();
    h.sync.save(&domain, LanguageCode::En, &homepage("first")).await.unwrap();
    h.remote.set_available(false);

    let err = h.sync.save(&domain, LanguageCode::En, &homepage("second")).await.unwrap_err();

    assert!(matches!(err, SaveError::Remote { .. }));
    assert!(err.advice().is_some());
    assert_eq!(h.local.get(&domain, LanguageCode::En).unwrap(), Some(homepage("first")));
    assert_eq!(h.notices().len(), 1, "only the first save was announced");
}

#[tokio::test]
async fn oversized_document_is_rejected_before_any_remote_write() {
    let h = Harness::new();
    let domain = KnownDomain::News.domain();
    let summary = "x".repeat(10 * 1024 * 1024);
    let huge = doc(json!({
        "items": [{ "id": "1", "title": "Big", "summary": summary, "published": "2024-01-01" }]
    }));

    let err = h.sync.save(&domain, LanguageCode::Ko, &huge).await.unwrap_err();

    assert!(matches!(err, SaveError::Quota { .. }));
    assert!(err.hint().is_some());
    assert_eq!(h.remote.writes(), 0);
    assert_eq!(h.remote.stored(domain.as_str(), "ko"), None);
    assert!(h.notices().is_empty());
}

#[tokio::test]
async fn invalid_documents_are_rejected() {
    let h = Harness::new();

    let err = h
        .sync
        .save(&KnownDomain::Projects.domain(), LanguageCode::En, &doc(json!({ "items": [{}] })))
        .await
        .unwrap_err();
    assert!(matches!(err, SaveError::Invalid { source: SchemaError::Shape { .. }, .. }));

    let careers = ContentDomain::new("careers").unwrap();
    let err = h.sync.save(&careers, LanguageCode::En, &ContentDocument::empty()).await.unwrap_err();
    assert!(matches!(err, SaveError::Invalid { source: SchemaError::UnknownDomain { .. }, .. }));
    assert!(err.advice().is_some());

    assert_eq!(h.remote.writes(), 0);
}

#[tokio::test]
async fn translations_are_saved_nested() {
    let h = Harness::new();
    let bundle: TranslationBundle =
        [("nav.home", "Home"), ("nav.news", "News"), ("footer.rights", "All rights reserved.")]
            .into_iter()
            .collect();

    h.sync.save_translations(LanguageCode::En, &bundle).await.unwrap();

    let domain = KnownDomain::Translations.domain();
    let stored = h.remote.stored(domain.as_str(), "en").unwrap();
    assert_eq!(stored.text("nav.news"), Some("News"));
    assert_eq!(vitrine_translation::flatten(&stored).unwrap(), bundle);
}

#[tokio::test]
async fn conflicting_translation_keys_abort_the_save() {
    let h = Harness::new();
    let bundle: TranslationBundle = [("nav", "Menu"), ("nav.home", "Home")].into_iter().collect();

    let err = h.sync.save_translations(LanguageCode::Ja, &bundle).await.unwrap_err();

    assert!(matches!(
        err,
        SaveError::Transcode { source: vitrine_translation::TranscodeError::KeyConflict { .. }, .. }
    ));
    assert_eq!(h.remote.writes(), 0);
    assert!(h.local.entries().unwrap().is_empty());
}

#[tokio::test]
async fn reset_writes_the_compiled_default() {
    let h = Harness::new();
    let domain = KnownDomain::SupportPage.domain();
    let custom = doc(json!({ "title": "Custom", "intro": "Edited" }));
    h.sync.save(&domain, LanguageCode::Ja, &custom).await.unwrap();

    let restored = h.sync.reset(&domain, LanguageCode::Ja).await.unwrap();

    assert_eq!(Some(&restored), h.catalog.get(&domain, LanguageCode::Ko));
    assert_eq!(h.remote.stored(domain.as_str(), "ja"), Some(restored.clone()));
    assert_eq!(h.resolver.resolve(&domain, LanguageCode::Ja).await, restored);
    assert_eq!(h.notices().last().map(|n| n.origin), Some(ChangeOrigin::Reset));
}

#[tokio::test]
async fn local_only_save_skips_the_remote_store() {
    let h = Harness::new();
    h.remote.set_available(false);
    let domain = KnownDomain::Homepage.domain();

    h.sync.save_local_only(&domain, LanguageCode::Zh, &homepage("offline draft")).unwrap();

    assert_eq!(h.remote.writes(), 0);
    assert_eq!(h.resolver.resolve(&domain, LanguageCode::Zh).await, homepage("offline draft"));
    assert_eq!(h.notices().last().map(|n| n.origin), Some(ChangeOrigin::LocalOnly));

    let err = h.sync.save_local_only(&domain, LanguageCode::Zh, &doc(json!({}))).unwrap_err();
    assert!(matches!(err, SaveError::Invalid { .. }));
}

#[tokio::test]
async fn subscribed_views_see_the_saved_pair() {
    let h = Harness::new();
    let news = KnownDomain::News.domain();
    let mut stream = h.bus.subscribe_stream();

    h.sync.save(&news, LanguageCode::En, &doc(json!({ "items": [] }))).await.unwrap();

    let notice = stream.next_notice().await.unwrap();
    assert!(notice.concerns(&news, LanguageCode::En));
}

#[tokio::test(start_paused = true)]
async fn retry_policy_is_applied_per_call() {
    let h = Harness::new();
    h.remote.set_available(false);
    let domain = KnownDomain::News.domain();
    let body = doc(json!({ "items": [] }));

    h.sync.save(&domain, LanguageCode::Ko, &body).await.unwrap_err();
    assert_eq!(h.remote.writes(), 1, "default policy never retries");

    h.remote.reset_counters();
    let policy = RetryPolicy::exponential(3, Duration::from_millis(100));
    h.sync.save_with(&domain, LanguageCode::Ko, &body, &policy).await.unwrap_err();
    assert_eq!(h.remote.writes(), 3);

    h.remote.reset_counters();
    let sync = h.sync.clone().with_retry(policy);
    sync.save(&domain, LanguageCode::Ko, &body).await.unwrap_err();
    assert_eq!(h.remote.writes(), 3);
}

/// Fails the first `failures` writes, then delegates to the wrapped store.
#[derive(Debug)]
struct Flaky {
    inner: vitrine_database::MemoryContentStore,
    failures: std::sync::atomic::AtomicUsize,
}

impl RemoteContentStore for Flaky {
    async fn read(&self, collection: &str, id: &str) -> Result<Option<ContentDocument>, RemoteError> {
        self.inner.read(collection, id).await
    }

    async fn write(&self, collection: &str, id: &str, doc: &ContentDocument) -> Result<(), RemoteError> {
        use std::sync::atomic::Ordering;
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(RemoteError::Unavailable { message: "blip".into(), context: None });
        }
        self.inner.write(collection, id, doc).await
    }
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_ridden_out_with_retry() {
    let h = Harness::new();
    let flaky = Flaky { inner: h.remote.clone(), failures: 2.into() };
    let sync = Synchronizer::new(
        flaky,
        h.local.clone(),
        h.bus.clone(),
        h.catalog.clone(),
        SchemaRegistry::default(),
    )
    .with_retry(RetryPolicy::exponential(3, Duration::from_millis(50)));
    let domain = KnownDomain::Projects.domain();
    let body = doc(json!({ "items": [] }));

    sync.save(&domain, LanguageCode::En, &body).await.unwrap();

    assert_eq!(h.remote.stored(domain.as_str(), "en"), Some(body));
    assert_eq!(h.notices().len(), 1);
}
