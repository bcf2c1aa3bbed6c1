use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bizdesk_orders::{NewOrder, OrderPatch};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_deleted, respond_list};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/:id", get(get_order).patch(update_order).delete(delete_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<NewOrder>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(StatusCode::CREATED, services.domain.orders.place(tenant.tenant_id(), body).await)
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.orders.list(tenant.tenant_id()).await)
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.orders.get(tenant.tenant_id(), id).await)
}

/// PATCH /orders/:id, including status moves (`Pending` to `Delivered` or `Cancelled`).
pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<OrderPatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    respond(StatusCode::OK, services.domain.orders.update(tenant.tenant_id(), id, patch).await)
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.orders.delete(tenant.tenant_id(), id).await)
}
