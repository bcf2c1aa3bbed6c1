//! Process-wide tracing setup shared by binaries and tests.

pub mod tracing;

pub use crate::tracing::{init, LogSettings};
