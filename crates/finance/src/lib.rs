//! Finance module: the per-tenant ledger document and profit/loss reporting.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod ledger;
pub mod profit_loss;

pub use ledger::{
    ExpenseEntry, ExpensePatch, FinanceLedger, IncomeEntry, IncomePatch, NewExpense, NewIncome,
    NewSalary, SalaryEntry, SalaryPatch, Transaction, TransactionKind,
};
pub use profit_loss::{compute_profit_loss, ProfitLoss};
