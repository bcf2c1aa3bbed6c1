use std::sync::Arc;

use tracing::{info, instrument};

use bizdesk_core::{DomainResult, Entity, RecordId, TenantId};
use bizdesk_orders::{compute_supplier_performance, Order, SupplierPerformance};
use bizdesk_parties::{RegisterSupplier, Supplier, SupplierPatch};

use super::{claim_unique, load_or_not_found, release_unique, remove_or_not_found, ServiceResult};
use crate::store::{Collection, DocumentStore, UniqueIndex};

const EMAIL_CLAIMS: &str = "supplier_emails";

#[derive(Clone)]
pub struct SupplierService {
    suppliers: Collection<Supplier>,
    emails: UniqueIndex,
    orders: Collection<Order>,
}

impl SupplierService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            suppliers: Collection::new(Arc::clone(&store)),
            emails: UniqueIndex::new(Arc::clone(&store), EMAIL_CLAIMS),
            orders: Collection::new(store),
        }
    }

    async fn claim_email(&self, tenant_id: TenantId, supplier: &Supplier) -> ServiceResult<()> {
        claim_unique(
            &self.emails,
            &self.suppliers,
            tenant_id,
            "email",
            supplier.email(),
            supplier.id(),
            Supplier::email,
        )
        .await
    }

    #[instrument(skip(self, cmd))]
    pub async fn register(&self, tenant_id: TenantId, cmd: RegisterSupplier) -> ServiceResult<Supplier> {
        let supplier = Supplier::register(RecordId::new(), cmd)?;
        self.claim_email(tenant_id, &supplier).await?;
        if let Err(e) = self.suppliers.insert(tenant_id, &supplier).await {
            release_unique(&self.emails, tenant_id, supplier.email(), supplier.id()).await;
            return Err(e.into());
        }
        info!(supplier_id = %supplier.id(), "supplier registered");
        Ok(supplier)
    }

    pub async fn list(&self, tenant_id: TenantId) -> ServiceResult<Vec<Supplier>> {
        Ok(self.suppliers.values(tenant_id).await?)
    }

    pub async fn get(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Supplier> {
        Ok(load_or_not_found(&self.suppliers, tenant_id, id, "supplier").await?.value)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, tenant_id: TenantId, id: RecordId, patch: SupplierPatch) -> ServiceResult<Supplier> {
        let mut doc = load_or_not_found(&self.suppliers, tenant_id, id, "supplier").await?;
        let old_email = doc.value.email().to_string();

        doc.value.apply_patch(patch)?;
        let email_changed = doc.value.email() != old_email;
        if email_changed {
            self.claim_email(tenant_id, &doc.value).await?;
        }
        if let Err(e) = self.suppliers.replace(tenant_id, &doc).await {
            if email_changed {
                release_unique(&self.emails, tenant_id, doc.value.email(), id).await;
            }
            return Err(e.into());
        }
        if email_changed {
            release_unique(&self.emails, tenant_id, &old_email, id).await;
        }
        Ok(doc.value)
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Supplier> {
        self.decide(tenant_id, id, Supplier::approve).await
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Supplier> {
        self.decide(tenant_id, id, Supplier::reject).await
    }

    async fn decide(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        decision: fn(&mut Supplier) -> DomainResult<()>,
    ) -> ServiceResult<Supplier> {
        let mut doc = load_or_not_found(&self.suppliers, tenant_id, id, "supplier").await?;
        let before = doc.value.status();
        decision(&mut doc.value)?;
        if doc.value.status() != before {
            self.suppliers.replace(tenant_id, &doc).await?;
            info!(supplier_id = %id, status = ?doc.value.status(), "supplier status changed");
        }
        Ok(doc.value)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Supplier> {
        let supplier = remove_or_not_found(&self.suppliers, tenant_id, id, "supplier").await?;
        release_unique(&self.emails, tenant_id, supplier.email(), id).await;
        Ok(supplier)
    }

    /// Delivery performance of every supplier, from the current orders.
    pub async fn performance(&self, tenant_id: TenantId) -> ServiceResult<Vec<SupplierPerformance>> {
        let suppliers = self.suppliers.values(tenant_id).await?;
        let orders = self.orders.values(tenant_id).await?;
        Ok(compute_supplier_performance(&suppliers, &orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{OrderService, ServiceError};
    use crate::store::testing::YieldingStore;
    use crate::store::InMemoryDocumentStore;
    use bizdesk_core::{DomainError, ExpectedVersion, WasteType};
    use bizdesk_orders::{NewOrder, OrderPatch, OrderStatus, OnTimeRate};
    use bizdesk_parties::SupplierStatus;
    use rust_decimal_macros::dec;

    fn registration(email: &str) -> RegisterSupplier {
        RegisterSupplier {
            supplier_name: "Green Cycle".to_string(),
            supplier_product: "PET flakes".to_string(),
            quantity: dec!(100),
            amount: dec!(25000),
            email: email.to_string(),
        }
    }

    fn new_order(email: &str) -> NewOrder {
        NewOrder {
            waste_type: WasteType::Plastic,
            quantity: dec!(5),
            amount: dec!(1000),
            address: "4 Lake Rd".to_string(),
            phone_number: "0771234567".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let svc = SupplierService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        svc.register(t, registration("ops@green.lk")).await.unwrap();

        let err = svc.register(t, registration(" OPS@Green.lk ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateKey { field: "email", .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_registrations_keep_email_unique() {
        let svc = SupplierService::new(Arc::new(YieldingStore::default()));
        for round in 0..25 {
            let t = TenantId::new();
            let (a, b) = tokio::join!(
                svc.register(t, registration("same@example.com")),
                svc.register(t, registration("SAME@example.com")),
            );
            assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1, "round {round}");

            let loser = if a.is_err() { a } else { b };
            assert!(matches!(
                loser,
                Err(ServiceError::Domain(DomainError::DuplicateKey { field: "email", .. }))
            ));
            assert_eq!(svc.list(t).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn email_is_freed_by_delete_and_rename() {
        let svc = SupplierService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();

        let first = svc.register(t, registration("old@b.lk")).await.unwrap();
        let rename = SupplierPatch {
            email: Some("new@b.lk".to_string()),
            ..SupplierPatch::default()
        };
        svc.update(t, first.id(), rename).await.unwrap();

        // The old address is free, the new one is taken.
        let second = svc.register(t, registration("old@b.lk")).await.unwrap();
        assert!(svc.register(t, registration("new@b.lk")).await.is_err());

        svc.delete(t, second.id()).await.unwrap();
        svc.register(t, registration("old@b.lk")).await.unwrap();
    }

    #[tokio::test]
    async fn renaming_onto_a_taken_email_leaves_the_supplier_unchanged() {
        let svc = SupplierService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        svc.register(t, registration("a@b.lk")).await.unwrap();
        let other = svc.register(t, registration("c@b.lk")).await.unwrap();

        let clash = SupplierPatch {
            email: Some("A@b.lk".to_string()),
            ..SupplierPatch::default()
        };
        let err = svc.update(t, other.id(), clash).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateKey { .. })));
        assert_eq!(svc.get(t, other.id()).await.unwrap().email(), "c@b.lk");
    }

    #[tokio::test]
    async fn abandoned_claim_is_taken_over() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let svc = SupplierService::new(Arc::clone(&store));
        let t = TenantId::new();

        // Left behind by a create that never wrote its supplier.
        let stale = serde_json::json!({ "owner": RecordId::new(), "claimed_at": "2020-01-01T00:00:00Z" });
        store
            .save(t, EMAIL_CLAIMS, "a@b.lk", stale, ExpectedVersion::Exact(0))
            .await
            .unwrap();

        svc.register(t, registration("a@b.lk")).await.unwrap();
        assert!(svc.register(t, registration("a@b.lk")).await.is_err());
    }

    #[tokio::test]
    async fn approval_is_persisted_and_final() {
        let svc = SupplierService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        let s = svc.register(t, registration("a@b.lk")).await.unwrap();
        assert_eq!(s.status(), SupplierStatus::Pending);

        svc.approve(t, s.id()).await.unwrap();
        svc.approve(t, s.id()).await.unwrap();
        assert_eq!(svc.get(t, s.id()).await.unwrap().status(), SupplierStatus::Approved);

        let err = svc.reject(t, s.id()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn performance_joins_orders_by_email() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let suppliers = SupplierService::new(Arc::clone(&store));
        let orders = OrderService::new(store);
        let t = TenantId::new();

        suppliers.register(t, registration("a@b.lk")).await.unwrap();
        suppliers.register(t, registration("idle@b.lk")).await.unwrap();
        let mut placed = Vec::new();
        for _ in 0..4 {
            placed.push(orders.place(t, new_order("A@B.lk")).await.unwrap());
        }
        for order in &placed[..2] {
            let delivered = OrderPatch {
                status: Some(OrderStatus::Delivered),
                ..OrderPatch::default()
            };
            orders.update(t, order.id(), delivered).await.unwrap();
        }

        let report = suppliers.performance(t).await.unwrap();
        let busy = report.iter().find(|r| r.email == "a@b.lk").unwrap();
        assert_eq!(busy.total_orders, 4);
        assert_eq!(busy.delivery_success_rate.to_string(), "50.00");

        let idle = report.iter().find(|r| r.email == "idle@b.lk").unwrap();
        assert_eq!(idle.delivery_success_rate.to_string(), "0.00");
        assert_eq!(idle.on_time_delivery_percent, OnTimeRate::NotApplicable);
    }
}
