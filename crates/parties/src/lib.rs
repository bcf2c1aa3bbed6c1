//! Parties module: suppliers and employees.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod employee;
pub mod supplier;

pub use employee::{Employee, EmployeePatch, NewEmployee, PayDetails};
pub use supplier::{RegisterSupplier, Supplier, SupplierPatch, SupplierStatus};
