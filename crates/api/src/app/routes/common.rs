use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use bizdesk_infra::ServiceResult;

use crate::app::errors;

/// Serialize a service result with `status`, or map its error.
pub fn respond<T: Serialize>(status: StatusCode, result: ServiceResult<T>) -> axum::response::Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Lists are wrapped as `{"items": [...]}`.
pub fn respond_list<T: Serialize>(result: ServiceResult<Vec<T>>) -> axum::response::Response {
    match result {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub fn respond_deleted<T>(result: ServiceResult<T>) -> axum::response::Response {
    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
