//! Field-level validation shared by the domain modules.

use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// Reject blank required text.
pub fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject negative amounts. Zero is allowed.
pub fn require_non_negative(field: &str, value: Decimal) -> DomainResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Trim + lowercase an email so lookups by email compare equal.
pub fn normalize_email(value: &str) -> DomainResult<String> {
    let email = value.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::validation(format!("invalid email: {value}"))),
    }
}
