//! Inventory domain module: collected waste batches and low-stock monitoring.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod stock;

pub use item::{InventoryItem, InventoryPatch, NewInventoryItem};
pub use stock::{
    classify, evaluate, summarize, InventorySummary, LowStockAlert, StockDecision, StockStatus,
    LOW_STOCK_THRESHOLD_KG,
};
