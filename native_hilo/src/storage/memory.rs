use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StoreError};

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what the engine wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    fn map(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let mut a = MemoryStore::default();
        a.set("k", "1").unwrap();
        let mut b = a.clone();
        b.set("k", "2").unwrap();
        assert_eq!(a.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(a.get("missing").unwrap(), None);
    }
}
