use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use bizdesk_core::{ExpectedVersion, TenantId};

use super::{DocumentStore, StoreError, StoredDocument};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CollectionKey {
    tenant_id: TenantId,
    collection: String,
}

impl CollectionKey {
    fn new(tenant_id: TenantId, collection: &str) -> Self {
        Self {
            tenant_id,
            collection: collection.to_string(),
        }
    }
}

/// In-memory document store.
///
/// Intended for tests/dev and the default server profile. Data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<CollectionKey, BTreeMap<String, StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

fn version_mismatch(expected: ExpectedVersion, actual: u64) -> StoreError {
    StoreError::Conflict(format!("expected {expected:?}, found {actual}"))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let map = self.collections.read().map_err(poisoned)?;
        Ok(map
            .get(&CollectionKey::new(tenant_id, collection))
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn find_all(&self, tenant_id: TenantId, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let map = self.collections.read().map_err(poisoned)?;
        Ok(map
            .get(&CollectionKey::new(tenant_id, collection))
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        body: JsonValue,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        let mut map = self.collections.write().map_err(poisoned)?;
        let docs = map.entry(CollectionKey::new(tenant_id, collection)).or_default();

        let current = docs.get(id).map(|d| d.version).unwrap_or(0);
        if !expected.matches(current) {
            return Err(version_mismatch(expected, current));
        }

        let version = current + 1;
        docs.insert(
            id.to_string(),
            StoredDocument {
                id: id.to_string(),
                version,
                body,
            },
        );
        Ok(version)
    }

    async fn delete(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, StoreError> {
        let mut map = self.collections.write().map_err(poisoned)?;
        let Some(docs) = map.get_mut(&CollectionKey::new(tenant_id, collection)) else {
            return Ok(false);
        };

        let Some(current) = docs.get(id).map(|d| d.version) else {
            return Ok(false);
        };
        if !expected.matches(current) {
            return Err(version_mismatch(expected, current));
        }

        docs.remove(id);
        Ok(true)
    }
}
