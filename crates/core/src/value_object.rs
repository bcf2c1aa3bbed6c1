//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attributes
/// are interchangeable. [`crate::WasteType`] and [`crate::Percent`] are the
/// value objects shared across modules; records such as suppliers or ledger
/// entries are entities instead (see [`crate::Entity`]).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
