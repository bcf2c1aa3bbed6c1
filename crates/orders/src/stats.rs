//! Flat order counts and revenue across the whole order collection.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::order::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Orders with status `Delivered`.
    pub completed_orders: usize,
    /// Sum of every order amount, whatever its status.
    pub total_revenue: Decimal,
}

pub fn compute_order_stats(orders: &[Order]) -> OrderStats {
    orders.iter().fold(
        OrderStats {
            total_orders: 0,
            pending_orders: 0,
            completed_orders: 0,
            total_revenue: Decimal::ZERO,
        },
        |mut stats, order| {
            stats.total_orders += 1;
            match order.status() {
                OrderStatus::Pending => stats.pending_orders += 1,
                OrderStatus::Delivered => stats.completed_orders += 1,
                OrderStatus::Cancelled => {}
            }
            stats.total_revenue += order.amount();
            stats
        },
    )
}
