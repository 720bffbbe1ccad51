use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, KeyedDocument, StoreError, VersionCheck, VersionedDocument};

// ============================================================================
// In-Memory Document Store
// ============================================================================
//
// HashMap-backed reference implementation, used as the test double for every
// service in this crate. Two fault knobs exist for tests:
//
// - `with_write_delay`: sleeps before each write so two read-modify-write
//   cycles can be interleaved deterministically.
// - `inject_transient_failures`: fails the next N writes with `Unavailable`.
//
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, HashMap<String, VersionedDocument>>>>,
    write_delay: Option<Duration>,
    pending_failures: Arc<AtomicU32>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before taking the write lock on every `put`.
    pub fn with_write_delay(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Fail the next `count` writes with `StoreError::Unavailable`.
    pub fn inject_transient_failures(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn read_lock(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, HashMap<String, VersionedDocument>>>, StoreError>
    {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<VersionedDocument>, StoreError> {
        let collections = self.read_lock()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        data: Value,
        check: VersionCheck,
    ) -> Result<u64, StoreError> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.take_injected_failure() {
            return Err(StoreError::Unavailable("injected failure".into()));
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        let docs = collections.entry(collection.to_string()).or_default();
        let current = docs.get(key).map(|doc| doc.version).unwrap_or(0);

        match check {
            VersionCheck::Any => {}
            VersionCheck::Absent if current != 0 => {
                return Err(StoreError::Conflict {
                    expected: 0,
                    actual: current,
                });
            }
            VersionCheck::Matches(expected) if current != expected => {
                return Err(StoreError::Conflict {
                    expected,
                    actual: current,
                });
            }
            VersionCheck::Absent | VersionCheck::Matches(_) => {}
        }

        let version = current + 1;
        docs.insert(key.to_string(), VersionedDocument { data, version });
        Ok(version)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<KeyedDocument>, StoreError> {
        let collections = self.read_lock()?;
        let mut matches: Vec<KeyedDocument> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.data.get(field) == Some(value))
                    .map(|(key, doc)| KeyedDocument {
                        key: key.clone(),
                        data: doc.data.clone(),
                        version: doc.version,
                    })
                    .collect()
            })
            .unwrap_or_default();
        matches.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(matches)
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<KeyedDocument>, StoreError> {
        let collections = self.read_lock()?;
        let mut all: Vec<KeyedDocument> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, doc)| KeyedDocument {
                        key: key.clone(),
                        data: doc.data.clone(),
                        version: doc.version,
                    })
                    .collect()
            })
            .unwrap_or_default();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(all)
    }
}
