use gemmatalk_state_fs::FsStore;
use gemmatalk_types::{AppState, StateError, StateStore};
use serde_json::json;

// --- Basic CRUD ---

#[tokio::test]
async fn write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.write("key1", json!("hello")).await.unwrap();
    assert_eq!(store.read("key1").await.unwrap(), Some(json!("hello")));
}

#[tokio::test]
async fn read_missing_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());
    assert_eq!(store.read("missing").await.unwrap(), None);
}

#[tokio::test]
async fn overwrite_replaces_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.write("key1", json!(1)).await.unwrap();
    store.write("key1", json!(2)).await.unwrap();
    assert_eq!(store.read("key1").await.unwrap(), Some(json!(2)));
}

#[tokio::test]
async fn delete_removes_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.write("key1", json!("val")).await.unwrap();
    store.delete("key1").await.unwrap();
    assert_eq!(store.read("key1").await.unwrap(), None);
}

#[tokio::test]
async fn delete_missing_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());
    store.delete("nonexistent").await.unwrap();
}

// --- Listing ---

#[tokio::test]
async fn list_filters_by_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.write("tracker:sleep", json!(true)).await.unwrap();
    store.write("tracker:anxiety", json!(true)).await.unwrap();
    store.write("app_state", json!({})).await.unwrap();

    assert_eq!(
        store.list("tracker:").await.unwrap(),
        vec!["tracker:anxiety", "tracker:sleep"]
    );
}

#[tokio::test]
async fn list_before_first_write_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(&dir.path().join("not-yet"));
    assert!(store.list("").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_skips_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "hi").unwrap();
    let store = FsStore::new(dir.path());
    store.write("k", json!(1)).await.unwrap();
    assert_eq!(store.list("").await.unwrap(), vec!["k"]);
}

// --- Persistence ---

#[tokio::test]
async fn values_survive_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    FsStore::new(dir.path())
        .write("key1", json!({"a": [1, 2]}))
        .await
        .unwrap();

    let reopened = FsStore::new(dir.path());
    assert_eq!(
        reopened.read("key1").await.unwrap(),
        Some(json!({"a": [1, 2]}))
    );
}

#[tokio::test]
async fn app_state_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    let mut state = AppState::default();
    state.set_user_name("Sam");
    state.mark_completed("anxiety");
    state.add_goal("Stretch after lunch");
    state.add_journal_entry("Good coffee this morning");
    state.save(&store).await.unwrap();

    assert!(dir.path().join("app_state.json").exists());
    let reloaded = AppState::load(&FsStore::new(dir.path())).await.unwrap();
    assert_eq!(reloaded, state);
}

#[tokio::test]
async fn corrupt_file_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app_state.json"), "{not json").unwrap();
    let store = FsStore::new(dir.path());

    let err = AppState::load(&store).await.unwrap_err();
    assert!(matches!(err, StateError::Serialization(_)));
}
