//! Low-stock classification and inventory totals.
//!
//! The monitor only decides; delivering an alert is the caller's job.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use bizdesk_core::WasteType;

use crate::item::InventoryItem;

/// Batches lighter than this many kilograms are low stock. Same for every waste type.
pub const LOW_STOCK_THRESHOLD_KG: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockStatus {
    pub is_low_stock: bool,
}

/// Payload handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockAlert {
    pub batch_id: String,
    pub total_weight: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockDecision {
    pub status: StockStatus,
    pub alert: Option<LowStockAlert>,
}

impl StockDecision {
    pub fn should_notify(&self) -> bool {
        self.alert.is_some()
    }
}

pub fn classify(item: &InventoryItem) -> StockStatus {
    StockStatus {
        is_low_stock: item.total_weight() < LOW_STOCK_THRESHOLD_KG,
    }
}

/// Decide whether a create (`previous == None`) or an update should alert.
///
/// Alerts fire when the batch is low and was not already low, so repeated
/// edits of a low batch do not re-notify.
pub fn evaluate(previous: Option<&InventoryItem>, current: &InventoryItem) -> StockDecision {
    let status = classify(current);
    let was_low = previous.is_some_and(|p| classify(p).is_low_stock);

    let alert = (status.is_low_stock && !was_low).then(|| LowStockAlert {
        batch_id: current.batch_id().to_string(),
        total_weight: current.total_weight(),
    });

    StockDecision { status, alert }
}

/// Totals recomputed from the full item set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_weight: Decimal,
    pub low_stock_count: usize,
    pub weight_breakdown: BTreeMap<WasteType, Decimal>,
}

pub fn summarize(items: &[InventoryItem]) -> InventorySummary {
    let mut total_weight = Decimal::ZERO;
    let mut low_stock_count = 0;
    let mut weight_breakdown = BTreeMap::new();

    for item in items {
        total_weight += item.total_weight();
        if classify(item).is_low_stock {
            low_stock_count += 1;
        }
        *weight_breakdown.entry(item.waste_type()).or_insert(Decimal::ZERO) += item.total_weight();
    }

    InventorySummary {
        item_count: items.len(),
        total_weight,
        low_stock_count,
        weight_breakdown,
    }
}
