//! Finance document endpoints: income, expenses, salaries and derived views.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};

use bizdesk_finance::{ExpensePatch, IncomePatch, SalaryPatch};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_deleted, respond_list};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/income", post(add_income))
        .route("/income/:id", patch(update_income).delete(delete_income))
        .route("/expense", post(add_expense))
        .route("/expense/:id", patch(update_expense).delete(delete_expense))
        .route("/salary", post(add_salary))
        .route("/salary/:id", patch(update_salary).delete(delete_salary))
        .route("/finance", get(get_finance))
        .route("/transactions", get(list_transactions))
        .route("/profit-loss", get(get_profit_loss))
}

pub async fn add_income(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::CreateIncomeRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let result = services
        .domain
        .finance
        .add_income(tenant.tenant_id(), body.into_command())
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn update_income(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<IncomePatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    let result = services.domain.finance.update_income(tenant.tenant_id(), id, patch).await;
    respond(StatusCode::OK, result)
}

pub async fn delete_income(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.finance.delete_income(tenant.tenant_id(), id).await)
}

pub async fn add_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::CreateExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let result = services
        .domain
        .finance
        .add_expense(tenant.tenant_id(), body.into_command())
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn update_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<ExpensePatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    let result = services.domain.finance.update_expense(tenant.tenant_id(), id, patch).await;
    respond(StatusCode::OK, result)
}

pub async fn delete_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.finance.delete_expense(tenant.tenant_id(), id).await)
}

pub async fn add_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::CreateSalaryRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let result = services
        .domain
        .finance
        .add_salary(tenant.tenant_id(), body.into_command())
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn update_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    body: Result<Json<SalaryPatch>, JsonRejection>,
) -> axum::response::Response {
    let (id, patch) = match (dto::parse_id(&id), dto::json_body(body)) {
        (Ok(id), Ok(patch)) => (id, patch),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    let result = services.domain.finance.update_salary(tenant.tenant_id(), id, patch).await;
    respond(StatusCode::OK, result)
}

pub async fn delete_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(services.domain.finance.delete_salary(tenant.tenant_id(), id).await)
}

/// GET /finance: the whole finance document.
pub async fn get_finance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.domain.finance.ledger(tenant.tenant_id()).await)
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond_list(services.domain.finance.transactions(tenant.tenant_id()).await)
}

pub async fn get_profit_loss(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.domain.finance.profit_loss(tenant.tenant_id()).await)
}
