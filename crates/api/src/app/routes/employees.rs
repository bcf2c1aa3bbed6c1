use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bizdesk_parties::{EmployeePatch, NewEmployee};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_deleted, respond_list};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees).post(add_employee))
        .route("/:id", get(get_employee).patch(update_employee).delete(delete_employee))
}

pub async fn add_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<NewEmployee>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(StatusCode::CREATED, services.domain.employees.hire(tenant.tenant_id(), body).await)
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.employees.list(tenant.tenant_id()).await)
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.domain.employees.get(tenant.tenant_id(), id).await)
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<EmployeePatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    respond(
        StatusCode::OK,
        services.domain.employees.update(tenant.tenant_id(), id, patch).await,
    )
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.employees.delete(tenant.tenant_id(), id).await)
}
