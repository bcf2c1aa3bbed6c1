//! Application services: load aggregates, run domain logic, save them back.
//!
//! Each mutation is one read-modify-write cycle guarded by the version read at
//! load time. Losing a race surfaces as a conflict; nothing is retried.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use bizdesk_core::{AggregateRoot, DomainError, RecordId, TenantId, Versioned};

use crate::notify::Notifier;
use crate::store::{ClaimOutcome, Collection, DocumentStore, StoreError, UniqueIndex};

pub mod employees;
pub mod finance;
pub mod inventory;
pub mod orders;
pub mod suppliers;

pub use employees::EmployeeService;
pub use finance::FinanceService;
pub use inventory::{InventoryService, StockedItem};
pub use orders::OrderService;
pub use suppliers::SupplierService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every service, sharing one store.
#[derive(Clone)]
pub struct Services {
    pub finance: FinanceService,
    pub inventory: InventoryService,
    pub suppliers: SupplierService,
    pub orders: OrderService,
    pub employees: EmployeeService,
}

impl Services {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            finance: FinanceService::new(Arc::clone(&store)),
            inventory: InventoryService::new(Arc::clone(&store), notifier),
            suppliers: SupplierService::new(Arc::clone(&store)),
            orders: OrderService::new(Arc::clone(&store)),
            employees: EmployeeService::new(store),
        }
    }
}

/// Load a document by record id or fail with `NotFound("<what> <id>")`.
pub(crate) async fn load_or_not_found<T>(
    collection: &Collection<T>,
    tenant_id: TenantId,
    id: RecordId,
    what: &str,
) -> ServiceResult<Versioned<T>>
where
    T: AggregateRoot + Serialize + DeserializeOwned,
{
    collection
        .get(tenant_id, &id.to_string())
        .await?
        .ok_or_else(|| DomainError::not_found(format!("{what} {id}")).into())
}

/// Delete a document by record id or fail with `NotFound`.
pub(crate) async fn remove_or_not_found<T>(
    collection: &Collection<T>,
    tenant_id: TenantId,
    id: RecordId,
    what: &str,
) -> ServiceResult<T>
where
    T: AggregateRoot + Serialize + DeserializeOwned,
{
    let doc = load_or_not_found(collection, tenant_id, id, what).await?;
    if !collection.remove(tenant_id, &doc).await? {
        return Err(DomainError::not_found(format!("{what} {id}")).into());
    }
    Ok(doc.value)
}

/// Reserve the unique value `key` for record `owner`, or fail with `DuplicateKey`.
///
/// A claim whose holder no longer carries `key` (a crash between claim and
/// write, or between write and release) is taken over once it is past its
/// grace period. Younger claims may belong to a create still in flight.
pub(crate) async fn claim_unique<T>(
    index: &UniqueIndex,
    records: &Collection<T>,
    tenant_id: TenantId,
    field: &'static str,
    key: &str,
    owner: RecordId,
    key_of: fn(&T) -> &str,
) -> ServiceResult<()>
where
    T: AggregateRoot + Serialize + DeserializeOwned,
{
    let ClaimOutcome::HeldBy {
        owner: holder,
        version,
        past_grace,
    } = index.claim(tenant_id, key, owner).await?
    else {
        return Ok(());
    };

    let holder_has_key = records
        .get(tenant_id, &holder.to_string())
        .await?
        .is_some_and(|doc| key_of(&doc.value) == key);
    if holder_has_key || !past_grace {
        return Err(DomainError::duplicate(field, key).into());
    }

    warn!(%tenant_id, field, key, %holder, "taking over abandoned unique claim");
    index.take_over(tenant_id, key, owner, version).await?;
    Ok(())
}

/// Drop `owner`'s claim on `key`. Failures are logged; a leftover claim is
/// reclaimable later because its owner no longer carries the value.
pub(crate) async fn release_unique(index: &UniqueIndex, tenant_id: TenantId, key: &str, owner: RecordId) {
    if let Err(error) = index.release(tenant_id, key, owner).await {
        warn!(%tenant_id, key, %owner, %error, "could not release unique claim");
    }
}
