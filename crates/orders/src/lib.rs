//! Orders module: customer orders and the supplier reports derived from them.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod order;
pub mod performance;
pub mod stats;

pub use order::{NewOrder, Order, OrderPatch, OrderStatus};
pub use performance::{compute_supplier_performance, OnTimeRate, SupplierPerformance};
pub use stats::{compute_order_stats, OrderStats};
