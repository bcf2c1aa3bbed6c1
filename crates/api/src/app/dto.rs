use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use bizdesk_core::RecordId;
use bizdesk_finance::{NewExpense, NewIncome, NewSalary};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    pub source: String,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub category: String,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSalaryRequest {
    #[serde(alias = "employee")]
    pub employee_ref: String,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
}

impl CreateIncomeRequest {
    pub fn into_command(self) -> NewIncome {
        NewIncome {
            entry_id: RecordId::new(),
            source: self.source,
            amount: self.amount,
            date: self.date.unwrap_or_else(Utc::now),
            description: self.description,
        }
    }
}

impl CreateExpenseRequest {
    pub fn into_command(self) -> NewExpense {
        NewExpense {
            entry_id: RecordId::new(),
            category: self.category,
            amount: self.amount,
            date: self.date.unwrap_or_else(Utc::now),
            description: self.description,
        }
    }
}

impl CreateSalaryRequest {
    pub fn into_command(self) -> NewSalary {
        NewSalary {
            entry_id: RecordId::new(),
            employee_ref: self.employee_ref,
            amount: self.amount,
            date: self.date.unwrap_or_else(Utc::now),
        }
    }
}

// -------------------------
// Mapping helpers
// -------------------------

/// Unwrap a JSON body, turning malformed input into the usual `{error, message}` 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )),
    }
}

pub fn parse_id(raw: &str) -> Result<RecordId, axum::response::Response> {
    raw.parse::<RecordId>()
        .map_err(errors::domain_error_to_response)
}
