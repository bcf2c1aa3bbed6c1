//! Per-supplier delivery performance, joined from orders by email.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use bizdesk_core::{Entity, Percent, RecordId};
use bizdesk_parties::{Supplier, SupplierStatus};

use crate::order::{Order, OrderStatus};

/// On-time share of delivered orders; not applicable until something was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnTimeRate {
    Percent(Percent),
    NotApplicable,
}

impl core::fmt::Display for OnTimeRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OnTimeRate::Percent(p) => core::fmt::Display::fmt(p, f),
            OnTimeRate::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for OnTimeRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierPerformance {
    pub supplier_id: RecordId,
    pub supplier_name: String,
    pub email: String,
    pub status: SupplierStatus,
    pub total_orders: usize,
    pub delivered_orders: usize,
    pub cancelled_orders: usize,
    pub on_time_deliveries: usize,
    pub delivery_success_rate: Percent,
    pub on_time_delivery_percent: OnTimeRate,
}

#[derive(Default)]
struct Tally {
    total: usize,
    delivered: usize,
    cancelled: usize,
}

/// One row per supplier, in supplier order.
pub fn compute_supplier_performance(suppliers: &[Supplier], orders: &[Order]) -> Vec<SupplierPerformance> {
    let mut by_email: HashMap<&str, Tally> = HashMap::new();
    for order in orders {
        let tally = by_email.entry(order.email()).or_default();
        tally.total += 1;
        match order.status() {
            OrderStatus::Delivered => tally.delivered += 1,
            OrderStatus::Cancelled => tally.cancelled += 1,
            OrderStatus::Pending => {}
        }
    }

    suppliers
        .iter()
        .map(|supplier| {
            let tally = by_email.get(supplier.email());
            let (total, delivered, cancelled) = tally
                .map(|t| (t.total, t.delivered, t.cancelled))
                .unwrap_or((0, 0, 0));

            // TODO: record delivered_at and expected_delivery_date on Order; until
            // then no delivery can be shown to be on time.
            let on_time = 0usize;

            let delivery_success_rate =
                Percent::ratio(delivered as u64, total as u64).unwrap_or_else(Percent::zero);
            let on_time_delivery_percent = match Percent::ratio(on_time as u64, delivered as u64) {
                Some(p) => OnTimeRate::Percent(p),
                None => OnTimeRate::NotApplicable,
            };

            SupplierPerformance {
                supplier_id: supplier.id(),
                supplier_name: supplier.supplier_name().to_string(),
                email: supplier.email().to_string(),
                status: supplier.status(),
                total_orders: total,
                delivered_orders: delivered,
                cancelled_orders: cancelled,
                on_time_deliveries: on_time,
                delivery_success_rate,
                on_time_delivery_percent,
            }
        })
        .collect()
}
