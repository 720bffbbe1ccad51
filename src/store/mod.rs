use async_trait::async_trait;
use serde_json::Value;

mod handle;
mod memory;

pub use handle::StoreHandle;
pub use memory::InMemoryStore;

// ============================================================================
// Document Store Collaborator
// ============================================================================
//
// The core treats its backend as an opaque key-addressed document collection:
// versioned reads, conditional writes, field-equality queries. Every document
// carries a store-managed version so read-modify-write cycles can be made
// atomic via compare-and-swap at the application layer.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("version conflict: expected {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt document in {collection}/{key}: {message}")]
    Corrupt {
        collection: String,
        key: String,
        message: String,
    },
}

/// A document read together with its current version.
///
/// Versions start at 1 on first write and increment on every accepted write.
#[derive(Debug, Clone)]
pub struct VersionedDocument {
    pub data: Value,
    pub version: u64,
}

/// A document returned from a collection scan or query, with its key.
#[derive(Debug, Clone)]
pub struct KeyedDocument {
    pub key: String,
    pub data: Value,
    pub version: u64,
}

/// Write precondition for [`DocumentStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    /// Unconditional write. Reserved for reference data (promo codes,
    /// products) where last-writer-wins is acceptable.
    Any,
    /// The document must not exist yet.
    Absent,
    /// The document's current version must equal the given value.
    Matches(u64),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by key. `None` when absent.
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<VersionedDocument>, StoreError>;

    /// Write a document subject to a version precondition.
    /// Returns the new version on success.
    async fn put(
        &self,
        collection: &str,
        key: &str,
        data: Value,
        check: VersionCheck,
    ) -> Result<u64, StoreError>;

    /// Remove a document. No-op when absent.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// All documents in the collection whose top-level `field` equals `value`.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<KeyedDocument>, StoreError>;

    /// Every document in the collection.
    async fn list_all(&self, collection: &str) -> Result<Vec<KeyedDocument>, StoreError>;
}
