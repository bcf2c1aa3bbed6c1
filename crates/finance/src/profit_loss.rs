//! Profit/loss over the typed lists of a finance ledger.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::FinanceLedger;

/// Totals per list plus the resulting profit (negative means loss).
///
/// Exact decimal sums; formatting for display is left to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfitLoss {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_salaries: Decimal,
    pub profit_loss: Decimal,
}

pub fn compute_profit_loss(ledger: &FinanceLedger) -> ProfitLoss {
    let total_income: Decimal = ledger.income().iter().map(|e| e.amount).sum();
    let total_expenses: Decimal = ledger.expenses().iter().map(|e| e.amount).sum();
    let total_salaries: Decimal = ledger.salaries().iter().map(|e| e.amount).sum();

    ProfitLoss {
        total_income,
        total_expenses,
        total_salaries,
        profit_loss: total_income - (total_expenses + total_salaries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NewExpense, NewIncome, NewSalary, TransactionKind};
    use bizdesk_core::{RecordId, TenantId};
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn ledger_with(income: &[Decimal], expenses: &[Decimal], salaries: &[Decimal]) -> FinanceLedger {
        let mut ledger = FinanceLedger::new(TenantId::new());
        for amount in income {
            ledger
                .add_income(NewIncome {
                    entry_id: RecordId::new(),
                    source: "Sales".to_string(),
                    amount: *amount,
                    date: Utc::now(),
                    description: None,
                })
                .unwrap();
        }
        for amount in expenses {
            ledger
                .add_expense(NewExpense {
                    entry_id: RecordId::new(),
                    category: "Rent".to_string(),
                    amount: *amount,
                    date: Utc::now(),
                    description: None,
                })
                .unwrap();
        }
        for amount in salaries {
            ledger
                .add_salary(NewSalary {
                    entry_id: RecordId::new(),
                    employee_ref: "EMP-1".to_string(),
                    amount: *amount,
                    date: Utc::now(),
                })
                .unwrap();
        }
        ledger
    }

    #[test]
    fn totals_and_profit() {
        let ledger = ledger_with(&[dec!(100), dec!(200)], &[dec!(50)], &[dec!(30)]);
        let report = compute_profit_loss(&ledger);

        assert_eq!(report.total_income, dec!(300));
        assert_eq!(report.total_expenses, dec!(50));
        assert_eq!(report.total_salaries, dec!(30));
        assert_eq!(report.profit_loss, dec!(220));
    }

    #[test]
    fn empty_ledger_breaks_even() {
        let report = compute_profit_loss(&FinanceLedger::new(TenantId::new()));
        assert_eq!(report.profit_loss, Decimal::ZERO);
    }

    #[test]
    fn loss_is_negative_and_exact() {
        let ledger = ledger_with(&[dec!(0.10), dec!(0.20)], &[dec!(0.25)], &[dec!(0.10)]);
        let report = compute_profit_loss(&ledger);
        assert_eq!(report.total_income, dec!(0.30));
        assert_eq!(report.profit_loss, dec!(-0.05));
    }

    proptest! {
        /// Property: the signed sum of the transaction log equals the profit.
        #[test]
        fn log_and_typed_lists_agree(
            income in prop::collection::vec(0u32..100_000, 0..8),
            expenses in prop::collection::vec(0u32..100_000, 0..8),
            salaries in prop::collection::vec(0u32..100_000, 0..8),
        ) {
            let to_dec = |v: &Vec<u32>| v.iter().map(|c| Decimal::new(i64::from(*c), 2)).collect::<Vec<_>>();
            let ledger = ledger_with(&to_dec(&income), &to_dec(&expenses), &to_dec(&salaries));
            let report = compute_profit_loss(&ledger);

            let from_log: Decimal = ledger
                .transactions()
                .iter()
                .map(|tx| match tx.kind {
                    TransactionKind::Income => tx.amount,
                    TransactionKind::Expense | TransactionKind::Salary => -tx.amount,
                })
                .sum();
            prop_assert_eq!(from_log, report.profit_loss);
        }
    }
}
