//! Typed view over one collection of a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use bizdesk_core::{AggregateRoot, ExpectedVersion, TenantId, Versioned};

use super::{DocumentStore, StoreError, StoredDocument};

/// Maps aggregates of type `T` to and from JSON documents in `T::COLLECTION`.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: AggregateRoot + Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn decode(doc: StoredDocument) -> Result<Versioned<T>, StoreError> {
        let value = serde_json::from_value(doc.body)?;
        Ok(Versioned::new(doc.version, value))
    }

    pub async fn get(&self, tenant_id: TenantId, id: &str) -> Result<Option<Versioned<T>>, StoreError> {
        self.store
            .find_by_id(tenant_id, T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<Versioned<T>>, StoreError> {
        self.store
            .find_all(tenant_id, T::COLLECTION)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Plain values of [`Collection::list`].
    pub async fn values(&self, tenant_id: TenantId) -> Result<Vec<T>, StoreError> {
        Ok(self.list(tenant_id).await?.into_iter().map(|v| v.value).collect())
    }

    /// Store a new document; fails with `Conflict` if the id is already taken.
    pub async fn insert(&self, tenant_id: TenantId, value: &T) -> Result<u64, StoreError> {
        self.write(tenant_id, value, ExpectedVersion::Exact(0)).await
    }

    /// Write back a document read earlier at `expected`.
    pub async fn write(&self, tenant_id: TenantId, value: &T, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let body = serde_json::to_value(value)?;
        self.store
            .save(tenant_id, T::COLLECTION, &value.document_id(), body, expected)
            .await
    }

    pub async fn replace(&self, tenant_id: TenantId, doc: &Versioned<T>) -> Result<u64, StoreError> {
        self.write(tenant_id, &doc.value, doc.expected()).await
    }

    pub async fn remove(&self, tenant_id: TenantId, doc: &Versioned<T>) -> Result<bool, StoreError> {
        self.store
            .delete(tenant_id, T::COLLECTION, &doc.value.document_id(), doc.expected())
            .await
    }
}
