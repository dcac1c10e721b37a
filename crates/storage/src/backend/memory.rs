use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::{slot_name, KvBackend};
use crate::errors::StorageError;
use crate::value::{LoadOutcome, StoredValue};

/// Process-local key-value map used in ephemeral mode.
///
/// Cloning shares the underlying map. Nothing is evicted and nothing survives
/// the process; the owner decides how long the store lives.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Number of occupied slots.
    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    /// Whether the slot for `key` has been written.
    pub fn contains(&self, key: &str) -> bool { self.inner.contains_key(slot_name(key)) }
}

impl KvBackend for MemoryStore {
    fn save(&self, key: &str, value: &StoredValue) -> Result<(), StorageError> {
        let slot = slot_name(key);
        debug!(key, slot, "memory save");
        self.inner.insert(slot.to_string(), value.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> LoadOutcome {
        self.inner.get(slot_name(key)).map(|v| v.value().clone()).into()
    }
}
