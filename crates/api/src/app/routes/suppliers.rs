use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bizdesk_parties::{RegisterSupplier, SupplierPatch};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_deleted, respond_list};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_supplier).get(list_suppliers))
        .route("/performance", get(supplier_performance))
        .route("/stats", get(order_stats))
        .route("/:id", get(get_supplier).patch(update_supplier).delete(delete_supplier))
        .route("/:id/approve", post(approve_supplier))
        .route("/:id/reject", post(reject_supplier))
}

pub async fn register_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<RegisterSupplier>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(
        StatusCode::CREATED,
        services.domain.suppliers.register(tenant.tenant_id(), body).await,
    )
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.suppliers.list(tenant.tenant_id()).await)
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.suppliers.get(tenant.tenant_id(), id).await)
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<SupplierPatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    respond(
        StatusCode::OK,
        services.domain.suppliers.update(tenant.tenant_id(), id, patch).await,
    )
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.suppliers.delete(tenant.tenant_id(), id).await)
}

pub async fn approve_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.suppliers.approve(tenant.tenant_id(), id).await)
}

pub async fn reject_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.suppliers.reject(tenant.tenant_id(), id).await)
}

/// GET /suppliers/performance
pub async fn supplier_performance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.suppliers.performance(tenant.tenant_id()).await)
}

/// GET /suppliers/stats: order totals across all suppliers.
pub async fn order_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.domain.orders.stats(tenant.tenant_id()).await)
}
