//! Store wrappers for tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use bizdesk_core::{ExpectedVersion, TenantId};

use super::{DocumentStore, InMemoryDocumentStore, StoreError, StoredDocument};

/// In-memory store that yields to the scheduler around every call, so
/// interleavings look like those of a networked backend.
#[derive(Debug, Default)]
pub(crate) struct YieldingStore {
    inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        tokio::task::yield_now().await;
        let out = self.inner.find_by_id(tenant_id, collection, id).await;
        tokio::task::yield_now().await;
        out
    }

    async fn find_all(&self, tenant_id: TenantId, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        tokio::task::yield_now().await;
        let out = self.inner.find_all(tenant_id, collection).await;
        tokio::task::yield_now().await;
        out
    }

    async fn save(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        body: JsonValue,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        tokio::task::yield_now().await;
        let out = self.inner.save(tenant_id, collection, id, body, expected).await;
        tokio::task::yield_now().await;
        out
    }

    async fn delete(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, StoreError> {
        tokio::task::yield_now().await;
        let out = self.inner.delete(tenant_id, collection, id, expected).await;
        tokio::task::yield_now().await;
        out
    }
}
