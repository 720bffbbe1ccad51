use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{DocumentStore, KeyedDocument, VersionCheck};
use crate::error::CoreError;

/// Default hard limit on any single store call.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Typed access to a [`DocumentStore`] with a hard timeout per call.
///
/// Repositories hold one of these instead of the raw trait object: it maps
/// `StoreError` into [`CoreError`], enforces the per-call timeout, and takes
/// care of document (de)serialization. Absent documents read back as the
/// type's `Default` at version 0, which is also the version a first
/// compare-and-swap write must assert.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<dyn DocumentStore>,
    op_timeout: Duration,
}

impl StoreHandle {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    pub fn with_timeout(store: Arc<dyn DocumentStore>, op_timeout: Duration) -> Self {
        Self { store, op_timeout }
    }

    /// Read a document, or its `Default` at version 0 when absent.
    pub async fn load<T>(&self, collection: &str, key: &str) -> Result<(T, u64), CoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.fetch(collection, key).await? {
            Some((value, version)) => Ok((value, version)),
            None => Ok((T::default(), 0)),
        }
    }

    /// Read a document that must exist.
    pub async fn require<T>(
        &self,
        collection: &str,
        key: &str,
        entity: &'static str,
    ) -> Result<(T, u64), CoreError>
    where
        T: DeserializeOwned,
    {
        self.fetch(collection, key)
            .await?
            .ok_or_else(|| CoreError::not_found(entity, key))
    }

    async fn fetch<T>(&self, collection: &str, key: &str) -> Result<Option<(T, u64)>, CoreError>
    where
        T: DeserializeOwned,
    {
        let doc = self.timed("store get", self.store.get(collection, key)).await?;
        match doc {
            Some(doc) => {
                let value = decode(collection, key, doc.data)?;
                Ok(Some((value, doc.version)))
            }
            None => Ok(None),
        }
    }

    /// Write a document subject to a version precondition.
    pub async fn save<T>(
        &self,
        collection: &str,
        key: &str,
        value: &T,
        check: VersionCheck,
    ) -> Result<u64, CoreError>
    where
        T: Serialize,
    {
        let data = serde_json::to_value(value)
            .map_err(|e| CoreError::StoreUnavailable(format!("encode {}/{}: {}", collection, key, e)))?;
        self.timed("store put", self.store.put(collection, key, data, check))
            .await
    }

    pub async fn delete(&self, collection: &str, key: &str) -> Result<(), CoreError> {
        self.timed("store delete", self.store.delete(collection, key))
            .await
    }

    /// Decode every document in the collection whose `field` equals `value`.
    pub async fn query_by_field<T>(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, T)>, CoreError>
    where
        T: DeserializeOwned,
    {
        let docs = self
            .timed(
                "store query",
                self.store.query_by_field(collection, field, value),
            )
            .await?;
        decode_all(collection, docs)
    }

    /// Decode every document in the collection.
    pub async fn list_all<T>(&self, collection: &str) -> Result<Vec<(String, T)>, CoreError>
    where
        T: DeserializeOwned,
    {
        let docs = self.timed("store scan", self.store.list_all(collection)).await?;
        decode_all(collection, docs)
    }

    async fn timed<T, E>(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = Result<T, E>>,
    ) -> Result<T, CoreError>
    where
        CoreError: From<E>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(CoreError::from),
            Err(_) => Err(CoreError::Timeout { operation }),
        }
    }
}

fn decode<T: DeserializeOwned>(collection: &str, key: &str, data: Value) -> Result<T, CoreError> {
    serde_json::from_value(data)
        .map_err(|e| CoreError::StoreUnavailable(format!("corrupt document in {}/{}: {}", collection, key, e)))
}

fn decode_all<T: DeserializeOwned>(
    collection: &str,
    docs: Vec<KeyedDocument>,
) -> Result<Vec<(String, T)>, CoreError> {
    docs.into_iter()
        .map(|doc| {
            let value = decode(collection, &doc.key, doc.data)?;
            Ok((doc.key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreError};
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Doc {
        count: u32,
    }

    #[tokio::test]
    async fn load_defaults_to_version_zero() {
        let handle = StoreHandle::new(Arc::new(InMemoryStore::new()));
        let (doc, version) = handle.load::<Doc>("docs", "missing").await.unwrap();
        assert_eq!(doc, Doc::default());
        assert_eq!(version, 0);
    }

    #[tokio::test]
    async fn require_surfaces_not_found() {
        let handle = StoreHandle::new(Arc::new(InMemoryStore::new()));
        let err = handle.require::<Doc>("docs", "missing", "doc").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "doc", .. }));
    }

    #[tokio::test]
    async fn save_then_load_round_trips_with_version() {
        let handle = StoreHandle::new(Arc::new(InMemoryStore::new()));
        let v = handle
            .save("docs", "a", &Doc { count: 7 }, VersionCheck::Absent)
            .await
            .unwrap();
        assert_eq!(v, 1);

        let (doc, version) = handle.load::<Doc>("docs", "a").await.unwrap();
        assert_eq!(doc, Doc { count: 7 });
        assert_eq!(version, 1);
    }

    /// Store whose reads never complete.
    struct StalledStore;

    #[async_trait]
    impl DocumentStore for StalledStore {
        async fn get(
            &self,
            _collection: &str,
            _key: &str,
        ) -> Result<Option<crate::store::VersionedDocument>, StoreError> {
            std::future::pending().await
        }

        async fn put(
            &self,
            _collection: &str,
            _key: &str,
            _data: Value,
            _check: VersionCheck,
        ) -> Result<u64, StoreError> {
            std::future::pending().await
        }

        async fn delete(&self, _collection: &str, _key: &str) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn query_by_field(
            &self,
            _collection: &str,
            _field: &str,
            _value: &Value,
        ) -> Result<Vec<KeyedDocument>, StoreError> {
            std::future::pending().await
        }

        async fn list_all(&self, _collection: &str) -> Result<Vec<KeyedDocument>, StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn stalled_call_surfaces_timeout() {
        let handle = StoreHandle::with_timeout(Arc::new(StalledStore), Duration::from_millis(20));
        let err = handle.load::<Doc>("docs", "a").await.unwrap_err();
        assert!(matches!(err, CoreError::Timeout { operation: "store get" }));
    }
}
