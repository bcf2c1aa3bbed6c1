use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bizdesk_inventory::{InventoryPatch, NewInventoryItem};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_deleted, respond_list};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/summary", get(get_summary))
        .route("/:id", get(get_item).patch(update_item).delete(delete_item))
}

/// POST /inventory
///
/// Low batches trigger a notification on create.
pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<NewInventoryItem>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(
        StatusCode::CREATED,
        services.domain.inventory.create(tenant.tenant_id(), body).await,
    )
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.inventory.list(tenant.tenant_id()).await)
}

pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.domain.inventory.summary(tenant.tenant_id()).await)
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.inventory.get(tenant.tenant_id(), id).await)
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<InventoryPatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    respond(
        StatusCode::OK,
        services.domain.inventory.update(tenant.tenant_id(), id, patch).await,
    )
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.inventory.delete(tenant.tenant_id(), id).await)
}
