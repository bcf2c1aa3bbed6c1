//! Delivery of stock alerts.
//!
//! Notification is fire-and-forget: a failed or unobserved delivery never
//! fails the inventory write that triggered it.

use serde::Serialize;
use tokio::sync::broadcast;

use bizdesk_core::TenantId;
use bizdesk_inventory::LowStockAlert;

pub const LOW_STOCK_TOPIC: &str = "inventory.low_stock";

/// Tenant-scoped message fanned out to realtime subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub tenant_id: TenantId,
    pub topic: String,
    pub payload: serde_json::Value,
}

pub trait Notifier: Send + Sync {
    fn low_stock(&self, tenant_id: TenantId, alert: &LowStockAlert);
}

/// Logs alerts and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn low_stock(&self, tenant_id: TenantId, alert: &LowStockAlert) {
        tracing::warn!(
            %tenant_id,
            batch_id = %alert.batch_id,
            total_weight = %alert.total_weight,
            "low stock"
        );
    }
}

/// Logs alerts and broadcasts them to live subscribers (SSE).
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn low_stock(&self, tenant_id: TenantId, alert: &LowStockAlert) {
        TracingNotifier.low_stock(tenant_id, alert);

        let payload = match serde_json::to_value(alert) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode low stock alert");
                return;
            }
        };

        // Lossy: no subscribers is not an error.
        let _ = self.tx.send(Notification {
            tenant_id,
            topic: LOW_STOCK_TOPIC.to_string(),
            payload,
        });
    }
}
