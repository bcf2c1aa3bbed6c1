//! `bizdesk-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod patch;
pub mod percent;
pub mod validate;
pub mod value_object;
pub mod waste;

pub use aggregate::{AggregateRoot, ExpectedVersion, Versioned};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, TenantId};
pub use percent::Percent;
pub use value_object::ValueObject;
pub use waste::WasteType;
