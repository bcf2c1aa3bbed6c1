//! Aggregate roots and optimistic concurrency.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Aggregate root: a document loaded, mutated and saved as a whole.
///
/// Aggregates stay free of IO. Services load them from the store, call the
/// pure mutators, then save them back with an [`ExpectedVersion`].
pub trait AggregateRoot {
    /// Document collection the aggregate is stored in.
    const COLLECTION: &'static str;

    /// Key of this aggregate inside its collection.
    fn document_id(&self) -> String;
}

/// Optimistic concurrency expectation for a save.
///
/// Version `0` means "the document does not exist yet".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (last write wins).
    Any,
    /// Require the stored document to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "document was modified concurrently (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// A value paired with the storage version it was read at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    /// Expectation to use when writing this value back.
    pub fn expected(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.version)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            version: self.version,
            value: f(self.value),
        }
    }
}
