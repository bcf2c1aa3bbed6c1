use axum::{routing::get, Router};

pub mod common;
pub mod employees;
pub mod finance;
pub mod inventory;
pub mod orders;
pub mod suppliers;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/notifications/stream", get(system::stream))
        .merge(finance::router())
        .nest("/inventory", inventory::router())
        .nest("/suppliers", suppliers::router())
        .nest("/orders", orders::router())
        .nest("/employees", employees::router())
}
