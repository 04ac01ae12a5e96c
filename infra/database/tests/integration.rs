use serde_json::json;
use vitrine_database::*;
use vitrine_domain::ContentDocument;

fn doc(value: serde_json::Value) -> ContentDocument {
    ContentDocument::new(value).unwrap()
}

async fn surreal() -> SurrealContentStore {
    SurrealContentStore::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn surreal_round_trips_documents() {
    let store = surreal().await;
    store.health().await.expect("health check");

    let body = doc(json!({ "hero": { "title": "Hello", "subtitle": "a.b keys stay" } }));
    store.write("homepage", "en", &body).await.unwrap();

    assert_eq!(store.read("homepage", "en").await.unwrap(), Some(body));
    assert_eq!(store.read("homepage", "ko").await.unwrap(), None);
    assert_eq!(store.read("news", "en").await.unwrap(), None);
}

#[tokio::test]
async fn surreal_write_is_last_write_wins() {
    let store = surreal().await;
    store.write("news", "ko", &doc(json!({ "items": [], "rev": 1 }))).await.unwrap();
    store.write("news", "ko", &doc(json!({ "items": [], "rev": 2 }))).await.unwrap();

    let stored = store.read("news", "ko").await.unwrap().unwrap();
    assert_eq!(stored.lookup("rev"), Some(&json!(2)));
}

#[tokio::test]
async fn zero_health_retries_still_checks_once() {
    let store = SurrealContentStore::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .health_retries(0)
        .init()
        .await
        .unwrap();
    store.write("projects", "ja", &doc(json!({ "items": [] }))).await.unwrap();
    assert!(store.read("projects", "ja").await.unwrap().is_some());
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = SurrealContentStore::builder().init().await.unwrap_err();
    assert!(matches!(err, RemoteError::Validation { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn memory_store_counts_calls_and_goes_offline() {
    let store = MemoryContentStore::new();
    store.insert("news", "en", doc(json!({ "items": [] })));
    assert_eq!(store.reads(), 0, "seeding is not a call");

    assert!(store.read("news", "en").await.unwrap().is_some());
    store.set_available(false);

    let err = store.read("news", "en").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(err.hint().is_some());
    assert!(store.write("news", "en", &doc(json!({}))).await.is_err());

    assert_eq!((store.reads(), store.writes()), (2, 1));
    assert!(store.stored("news", "en").unwrap().lookup("items").is_some(), "failed write kept old");
}

#[tokio::test]
async fn any_store_dispatches_to_variant() {
    let memory = MemoryContentStore::new();
    let any = AnyContentStore::from(memory.clone());

    any.write("support-page", "zh", &doc(json!({ "title": "t" }))).await.unwrap();
    assert_eq!(memory.writes(), 1);
    assert!(any.read("support-page", "zh").await.unwrap().is_some());
}
