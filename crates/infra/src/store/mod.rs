//! Tenant-scoped document storage.
//!
//! Every aggregate is persisted as one JSON document keyed by
//! `(tenant_id, collection, id)`. Writes carry an [`ExpectedVersion`] so that
//! concurrent read-modify-write cycles surface as [`StoreError::Conflict`]
//! instead of silently overwriting each other.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use bizdesk_core::{ExpectedVersion, TenantId};

pub mod collection;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(test)]
pub(crate) mod testing;
pub mod unique;

pub use collection::Collection;
pub use in_memory::InMemoryDocumentStore;
pub use unique::{ClaimOutcome, UniqueIndex};
#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;

/// A document as persisted, with the version it was stored at.
///
/// Versions start at 1 on insert and grow by one on every save.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub version: u64,
    pub body: JsonValue,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("document (de)serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Serialization(value.to_string())
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// All documents of a collection, ordered by id.
    async fn find_all(&self, tenant_id: TenantId, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Insert or replace a document. Returns the new version.
    ///
    /// `ExpectedVersion::Exact(0)` requires that the document does not exist yet.
    async fn save(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        body: JsonValue,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError>;

    /// Remove a document. Returns `false` when there was nothing to remove.
    async fn delete(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        (**self).find_by_id(tenant_id, collection, id).await
    }

    async fn find_all(&self, tenant_id: TenantId, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).find_all(tenant_id, collection).await
    }

    async fn save(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        body: JsonValue,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        (**self).save(tenant_id, collection, id, body, expected).await
    }

    async fn delete(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, StoreError> {
        (**self).delete(tenant_id, collection, id, expected).await
    }
}
