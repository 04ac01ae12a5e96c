use tempfile::TempDir;
use vitrine_domain::config::{CacheBackendKind, CacheConfig};
use vitrine_domain::{ContentDocument, KnownDomain, LanguageCode};
use vitrine_storage::*;

fn doc(json: &str) -> ContentDocument {
    ContentDocument::from_json(json).unwrap()
}

#[test]
fn absent_entry_is_none_not_error() {
    let cache = LocalCacheStore::memory();
    assert!(cache.get(&KnownDomain::Projects.domain(), LanguageCode::Ja).unwrap().is_none());
}

#[test]
fn entries_are_isolated_per_domain_and_language() {
    let cache = LocalCacheStore::memory();
    let news = KnownDomain::News.domain();
    let projects = KnownDomain::Projects.domain();

    cache.set(&news, LanguageCode::En, &doc(r#"{"items":[],"tag":"news-en"}"#)).unwrap();
    cache.set(&news, LanguageCode::Ko, &doc(r#"{"items":[],"tag":"news-ko"}"#)).unwrap();
    cache.set(&projects, LanguageCode::En, &doc(r#"{"items":[],"tag":"projects-en"}"#)).unwrap();

    let tag = |d: &vitrine_domain::ContentDomain, l: LanguageCode| cache.get(d, l).unwrap().unwrap().text("tag").map(str::to_owned);
    assert_eq!(tag(&news, LanguageCode::En).as_deref(), Some("news-en"));
    assert_eq!(tag(&news, LanguageCode::Ko).as_deref(), Some("news-ko"));
    assert_eq!(tag(&projects, LanguageCode::En).as_deref(), Some("projects-en"));
    assert!(cache.get(&projects, LanguageCode::Ko).unwrap().is_none());
}

#[test]
fn quota_rejects_oversized_write_and_keeps_previous_value() {
    let cache = LocalCacheStore::with_settings(MemoryBackend::new(), "vitrine:", 256);
    let homepage = KnownDomain::Homepage.domain();
    let small = doc(r#"{"hero":{"title":"small"}}"#);
    cache.set(&homepage, LanguageCode::Ko, &small).unwrap();

    let huge = doc(&format!(r#"{{"hero":{{"title":"{}"}}}}"#, "x".repeat(1024)));
    assert!(cache.check_fits(&homepage, LanguageCode::Ko, &huge).is_err());

    let err = cache.set(&homepage, LanguageCode::Ko, &huge).unwrap_err();
    assert!(matches!(err, StorageError::Quota { .. }));
    assert!(err.hint().is_some());
    assert_eq!(cache.get(&homepage, LanguageCode::Ko).unwrap(), Some(small));
}

#[test]
fn ten_megabyte_document_exceeds_default_quota() {
    let cache = LocalCacheStore::memory();
    let big = doc(&format!(r#"{{"blob":"{}"}}"#, "x".repeat(10 * 1024 * 1024)));

    let err = cache.set(&KnownDomain::News.domain(), LanguageCode::En, &big).unwrap_err();
    assert!(matches!(err, StorageError::Quota { .. }));
    assert_eq!(cache.usage().unwrap().used, 0);
}

#[test]
fn undecodable_entry_is_dropped_and_reported_absent() {
    let backend = MemoryBackend::new();
    let cache = LocalCacheStore::new(backend.clone());
    let news = KnownDomain::News.domain();
    backend.insert_raw(cache.key(&news, LanguageCode::En), "{not json");

    assert!(cache.get(&news, LanguageCode::En).unwrap().is_none());
    assert_eq!(backend.len(), 0, "corrupt entry removed");
}

#[test]
fn clear_only_touches_own_prefix() {
    let backend = MemoryBackend::new();
    let site = LocalCacheStore::with_settings(backend.clone(), "site:", DEFAULT_QUOTA_BYTES);
    let other = LocalCacheStore::with_settings(backend.clone(), "other:", DEFAULT_QUOTA_BYTES);
    let news = KnownDomain::News.domain();

    site.set(&news, LanguageCode::En, &doc("{}")).unwrap();
    site.set(&news, LanguageCode::Ko, &doc("{}")).unwrap();
    other.set(&news, LanguageCode::En, &doc("{}")).unwrap();

    assert_eq!(site.clear().unwrap(), 2);
    assert!(site.entries().unwrap().is_empty());
    assert_eq!(other.entries().unwrap(), vec![(news, LanguageCode::En)]);
}

#[test]
fn remove_and_usage_track_each_other() {
    let cache = LocalCacheStore::memory();
    let support = KnownDomain::SupportPage.domain();
    let value = doc(r#"{"title":"t"}"#);
    cache.set(&support, LanguageCode::Zh, &value).unwrap();

    let expected = (cache.key(&support, LanguageCode::Zh).len() + value.to_json().len()) as u64;
    assert_eq!(cache.usage().unwrap().used, expected);

    assert!(cache.remove(&support, LanguageCode::Zh).unwrap());
    assert!(!cache.remove(&support, LanguageCode::Zh).unwrap());
    assert_eq!(cache.usage().unwrap().used, 0);
}

#[test]
fn file_backend_survives_reopen_with_compression() {
    let temp = TempDir::new().unwrap();
    let homepage = KnownDomain::Homepage.domain();
    let value = doc(r#"{"hero":{"title":"persisted","subtitle":"across restarts"}}"#);

    {
        let backend =
            FileBackend::builder().root(temp.path()).compression(Compression::Lz4).open().unwrap();
        LocalCacheStore::new(backend).set(&homepage, LanguageCode::En, &value).unwrap();
    }

    let backend =
        FileBackend::builder().root(temp.path()).compression(Compression::Lz4).open().unwrap();
    let cache = LocalCacheStore::new(backend);
    assert_eq!(cache.get(&homepage, LanguageCode::En).unwrap(), Some(value.clone()));
    assert_eq!(cache.entries().unwrap(), vec![(homepage, LanguageCode::En)]);
    assert!(cache.usage().unwrap().used > 0, "size index rebuilt on open");
}

#[test]
fn file_backend_requires_existing_root_without_create() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent");
    let err = FileBackend::builder().root(&missing).create(false).open().unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn file_backend_keeps_keys_inside_root() {
    let temp = TempDir::new().unwrap();
    let backend = FileBackend::builder().root(temp.path()).open().unwrap();

    backend.set("../escape", "v").unwrap();
    assert_eq!(backend.get("../escape").unwrap().as_deref(), Some("v"));
    assert!(!temp.path().parent().unwrap().join("escape").exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn from_config_builds_file_store() {
    let temp = TempDir::new().unwrap();
    let config = CacheConfig {
        backend: CacheBackendKind::File,
        dir: temp.path().join("cache"),
        quota_bytes: 4096,
        key_prefix: "cfg:".to_owned(),
        compression: true,
    };

    let cache = LocalCacheStore::from_config(&config).unwrap();
    assert_eq!(cache.prefix(), "cfg:");
    assert_eq!(cache.usage().unwrap().quota, 4096);
    assert!(temp.path().join("cache").is_dir());
}

#[test]
fn entries_written_without_compression_are_dropped_when_reopened_with_lz4() {
    let temp = TempDir::new().unwrap();
    let news = KnownDomain::News.domain();
    let key = {
        let backend = FileBackend::builder().root(temp.path()).open().unwrap();
        let cache = LocalCacheStore::new(backend.clone());
        cache.set(&news, LanguageCode::En, &doc(r#"{"items":[]}"#)).unwrap();
        backend.entry_path(&cache.key(&news, LanguageCode::En))
    };
    assert!(key.exists());

    let backend =
        FileBackend::builder().root(temp.path()).compression(Compression::Lz4).open().unwrap();
    let cache = LocalCacheStore::new(backend);

    assert!(!key.exists(), "undecodable entry deleted on open");
    assert!(cache.entries().unwrap().is_empty());
    assert_eq!(cache.usage().unwrap().used, 0);
    assert!(cache.get(&news, LanguageCode::En).unwrap().is_none());
}

#[test]
fn damaged_file_entry_is_discarded_on_read() {
    let temp = TempDir::new().unwrap();
    let backend =
        FileBackend::builder().root(temp.path()).compression(Compression::Lz4).open().unwrap();
    let cache = LocalCacheStore::new(backend.clone());
    let projects = KnownDomain::Projects.domain();
    cache.set(&projects, LanguageCode::Ja, &doc(r#"{"items":[]}"#)).unwrap();

    let path = backend.entry_path(&cache.key(&projects, LanguageCode::Ja));
    std::fs::write(&path, [0x10, 0x00, 0x00, 0x00, 0xf0]).unwrap();

    assert!(cache.get(&projects, LanguageCode::Ja).unwrap().is_none());
    assert!(!path.exists());
    assert!(cache.entries().unwrap().is_empty());
    assert!(cache.get(&projects, LanguageCode::Ja).unwrap().is_none());
}

#[test]
fn full_precision_floats_survive_the_cache() {
    let cache = LocalCacheStore::memory();
    let news = KnownDomain::News.domain();
    let stats = doc(r#"{"stats":{"ratio":985.6906946328695,"share":0.1234567890123456}}"#);

    cache.set(&news, LanguageCode::Ko, &stats).unwrap();
    assert_eq!(cache.get(&news, LanguageCode::Ko).unwrap(), Some(stats));
}
