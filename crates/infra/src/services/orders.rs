use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use bizdesk_core::{Entity, RecordId, TenantId};
use bizdesk_orders::{compute_order_stats, NewOrder, Order, OrderPatch, OrderStats};

use super::{load_or_not_found, remove_or_not_found, ServiceResult};
use crate::store::{Collection, DocumentStore};

#[derive(Clone)]
pub struct OrderService {
    orders: Collection<Order>,
}

impl OrderService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: Collection::new(store),
        }
    }

    #[instrument(skip(self, cmd))]
    pub async fn place(&self, tenant_id: TenantId, cmd: NewOrder) -> ServiceResult<Order> {
        let order = Order::place(RecordId::new(), cmd, Utc::now())?;
        self.orders.insert(tenant_id, &order).await?;
        info!(order_id = %order.id(), "order placed");
        Ok(order)
    }

    pub async fn list(&self, tenant_id: TenantId) -> ServiceResult<Vec<Order>> {
        Ok(self.orders.values(tenant_id).await?)
    }

    pub async fn get(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Order> {
        Ok(load_or_not_found(&self.orders, tenant_id, id, "order").await?.value)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, tenant_id: TenantId, id: RecordId, patch: OrderPatch) -> ServiceResult<Order> {
        let mut doc = load_or_not_found(&self.orders, tenant_id, id, "order").await?;
        doc.value.apply_patch(patch)?;
        self.orders.replace(tenant_id, &doc).await?;
        Ok(doc.value)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Order> {
        remove_or_not_found(&self.orders, tenant_id, id, "order").await
    }

    pub async fn stats(&self, tenant_id: TenantId) -> ServiceResult<OrderStats> {
        let orders = self.orders.values(tenant_id).await?;
        Ok(compute_order_stats(&orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use crate::store::InMemoryDocumentStore;
    use bizdesk_core::{DomainError, WasteType};
    use bizdesk_orders::OrderStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn new_order(amount: Decimal) -> NewOrder {
        NewOrder {
            waste_type: WasteType::Metal,
            quantity: dec!(2),
            amount,
            address: "9 Hill St".to_string(),
            phone_number: "0812222333".to_string(),
            email: "buyer@shop.lk".to_string(),
        }
    }

    fn status(status: OrderStatus) -> OrderPatch {
        OrderPatch {
            status: Some(status),
            ..OrderPatch::default()
        }
    }

    #[tokio::test]
    async fn stats_follow_status_changes() {
        let svc = OrderService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        let a = svc.place(t, new_order(dec!(100))).await.unwrap();
        let b = svc.place(t, new_order(dec!(250))).await.unwrap();
        svc.place(t, new_order(dec!(50))).await.unwrap();

        svc.update(t, a.id(), status(OrderStatus::Delivered)).await.unwrap();
        svc.update(t, b.id(), status(OrderStatus::Cancelled)).await.unwrap();

        let stats = svc.stats(t).await.unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.total_revenue, dec!(400));
    }

    #[tokio::test]
    async fn delivered_orders_cannot_be_cancelled() {
        let svc = OrderService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        let order = svc.place(t, new_order(dec!(10))).await.unwrap();
        svc.update(t, order.id(), status(OrderStatus::Delivered)).await.unwrap();

        let err = svc.update(t, order.id(), status(OrderStatus::Cancelled)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert_eq!(svc.get(t, order.id()).await.unwrap().status(), OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let svc = OrderService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = TenantId::new();
        let order = svc.place(t, new_order(dec!(10))).await.unwrap();

        svc.delete(t, order.id()).await.unwrap();
        let err = svc.delete(t, order.id()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
    }
}
