#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use std::collections::HashMap;

use async_trait::async_trait;
use gemmatalk_types::{StateError, StateStore};
use tokio::sync::RwLock;

/// State store backed by a `HashMap` behind a `RwLock`.
pub struct MemoryStore {
    data: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StateError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StateError> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StateError> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StateError> {
        let data = self.data.read().await;
        let mut keys: Vec<String> = data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemmatalk_types::{APP_STATE_KEY, AppState};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn write_and_read_roundtrip() {
        let store = MemoryStore::new();
        store.write("key1", json!("hello")).await.unwrap();
        assert_eq!(store.read("key1").await.unwrap(), Some(json!("hello")));
    }

    #[tokio::test]
    async fn read_nonexistent_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.write("key1", json!(1)).await.unwrap();
        store.write("key1", json!(2)).await.unwrap();
        assert_eq!(store.read("key1").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn delete_removes_value() {
        let store = MemoryStore::new();
        store.write("key1", json!("hello")).await.unwrap();
        store.delete("key1").await.unwrap();
        assert_eq!(store.read("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_nonexistent_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("missing").await.is_ok());
    }

    #[tokio::test]
    async fn list_filters_by_prefix_and_sorts() {
        let store = MemoryStore::new();
        store.write("tracker:sleep", json!(true)).await.unwrap();
        store.write("tracker:anxiety", json!(true)).await.unwrap();
        store.write("user", json!("Sam")).await.unwrap();

        let keys = store.list("tracker:").await.unwrap();
        assert_eq!(keys, vec!["tracker:anxiety", "tracker:sleep"]);
        assert_eq!(store.list("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn app_state_survives_a_reload() {
        let store = MemoryStore::new();
        let mut state = AppState::load(&store).await.unwrap();
        assert_eq!(state, AppState::default());

        state.set_user_name("Sam");
        state.mark_visited("sleep");
        state.add_goal("Walk every morning");
        state.save(&store).await.unwrap();

        let reloaded = AppState::load(&store).await.unwrap();
        assert_eq!(reloaded, state);
        assert!(store.read(APP_STATE_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_keys() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.write(&format!("k{i:02}"), json!(i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.list("k").await.unwrap().len(), 16);
    }

    #[test]
    fn memory_store_implements_state_store() {
        fn _assert_state_store<T: StateStore>() {}
        _assert_state_store::<MemoryStore>();
    }
}
