use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{CoreError, CoreResult};

/// Key under which the transaction list is persisted.
pub const STORAGE_KEY: &str = "financial-transactions";

/// Abstraction over the key-value backend that holds serialized state.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored text for `key`, or `None` when the key is absent.
    fn read(&self, key: &str) -> CoreResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> CoreResult<()>;
    /// Removes `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> CoreResult<()>;
}

/// In-process backend. Clones share the same map, which lets a test keep a
/// handle on what a store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.write("k", "v").unwrap();
        assert_eq!(handle.read("k").unwrap().as_deref(), Some("v"));
        handle.delete("k").unwrap();
        assert!(!store.contains("k"));
        store.delete("missing").unwrap();
    }
}
