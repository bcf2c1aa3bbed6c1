use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use bizdesk_core::{Entity, RecordId, TenantId};
use bizdesk_inventory::{
    classify, evaluate, summarize, InventoryItem, InventoryPatch, InventorySummary, NewInventoryItem, StockStatus,
};

use super::{claim_unique, load_or_not_found, release_unique, remove_or_not_found, ServiceResult};
use crate::notify::Notifier;
use crate::store::{Collection, DocumentStore, UniqueIndex};

const BATCH_CLAIMS: &str = "inventory_batch_ids";

/// An item as returned to callers, with its stock flag alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockedItem {
    #[serde(flatten)]
    pub item: InventoryItem,
    #[serde(flatten)]
    pub status: StockStatus,
}

impl From<InventoryItem> for StockedItem {
    fn from(item: InventoryItem) -> Self {
        let status = classify(&item);
        Self { item, status }
    }
}

#[derive(Clone)]
pub struct InventoryService {
    items: Collection<InventoryItem>,
    batch_ids: UniqueIndex,
    notifier: Arc<dyn Notifier>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            items: Collection::new(Arc::clone(&store)),
            batch_ids: UniqueIndex::new(store, BATCH_CLAIMS),
            notifier,
        }
    }

    async fn claim_batch_id(&self, tenant_id: TenantId, item: &InventoryItem) -> ServiceResult<()> {
        claim_unique(
            &self.batch_ids,
            &self.items,
            tenant_id,
            "batch_id",
            item.batch_id(),
            item.id(),
            InventoryItem::batch_id,
        )
        .await
    }

    #[instrument(skip(self, cmd))]
    pub async fn create(&self, tenant_id: TenantId, cmd: NewInventoryItem) -> ServiceResult<StockedItem> {
        let item = InventoryItem::create(RecordId::new(), cmd)?;
        self.claim_batch_id(tenant_id, &item).await?;
        if let Err(e) = self.items.insert(tenant_id, &item).await {
            release_unique(&self.batch_ids, tenant_id, item.batch_id(), item.id()).await;
            return Err(e.into());
        }

        let decision = evaluate(None, &item);
        if let Some(alert) = &decision.alert {
            self.notifier.low_stock(tenant_id, alert);
        }
        info!(item_id = %item.id(), batch_id = item.batch_id(), "inventory item created");

        Ok(StockedItem {
            item,
            status: decision.status,
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, tenant_id: TenantId, id: RecordId, patch: InventoryPatch) -> ServiceResult<StockedItem> {
        let mut doc = load_or_not_found(&self.items, tenant_id, id, "inventory item").await?;
        let previous = doc.value.clone();

        doc.value.apply_patch(patch)?;
        let batch_changed = doc.value.batch_id() != previous.batch_id();
        if batch_changed {
            self.claim_batch_id(tenant_id, &doc.value).await?;
        }
        if let Err(e) = self.items.replace(tenant_id, &doc).await {
            if batch_changed {
                release_unique(&self.batch_ids, tenant_id, doc.value.batch_id(), id).await;
            }
            return Err(e.into());
        }
        if batch_changed {
            release_unique(&self.batch_ids, tenant_id, previous.batch_id(), id).await;
        }

        let decision = evaluate(Some(&previous), &doc.value);
        if let Some(alert) = &decision.alert {
            self.notifier.low_stock(tenant_id, alert);
        }

        Ok(StockedItem {
            item: doc.value,
            status: decision.status,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<InventoryItem> {
        let item = remove_or_not_found(&self.items, tenant_id, id, "inventory item").await?;
        release_unique(&self.batch_ids, tenant_id, item.batch_id(), id).await;
        Ok(item)
    }

    pub async fn get(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<StockedItem> {
        let doc = load_or_not_found(&self.items, tenant_id, id, "inventory item").await?;
        Ok(doc.value.into())
    }

    pub async fn list(&self, tenant_id: TenantId) -> ServiceResult<Vec<StockedItem>> {
        let items = self.items.values(tenant_id).await?;
        Ok(items.into_iter().map(StockedItem::from).collect())
    }

    /// Totals recomputed from every item on each call.
    pub async fn summary(&self, tenant_id: TenantId) -> ServiceResult<InventorySummary> {
        let items = self.items.values(tenant_id).await?;
        Ok(summarize(&items))
    }
}
