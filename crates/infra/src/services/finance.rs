use std::sync::Arc;

use tracing::{info, instrument};

use bizdesk_core::{DomainError, DomainResult, RecordId, TenantId, Versioned};
use bizdesk_finance::{
    compute_profit_loss, ExpenseEntry, ExpensePatch, FinanceLedger, IncomeEntry, IncomePatch, NewExpense, NewIncome,
    NewSalary, ProfitLoss, SalaryEntry, SalaryPatch, Transaction,
};

use super::ServiceResult;
use crate::store::{Collection, DocumentStore};

/// Owns the single finance document of each tenant.
#[derive(Clone)]
pub struct FinanceService {
    ledgers: Collection<FinanceLedger>,
}

impl FinanceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ledgers: Collection::new(store),
        }
    }

    async fn load(&self, tenant_id: TenantId) -> ServiceResult<Option<Versioned<FinanceLedger>>> {
        Ok(self.ledgers.get(tenant_id, FinanceLedger::DOCUMENT_ID).await?)
    }

    /// Run `op` against the tenant's ledger and save the result.
    ///
    /// With `bootstrap`, a missing ledger starts out empty and is inserted
    /// (version 0 expected); otherwise a missing ledger is `NotFound`.
    async fn mutate<R>(
        &self,
        tenant_id: TenantId,
        bootstrap: bool,
        op: impl FnOnce(&mut FinanceLedger) -> DomainResult<R>,
    ) -> ServiceResult<R> {
        let mut doc = match self.load(tenant_id).await? {
            Some(doc) => doc,
            None if bootstrap => {
                info!(%tenant_id, "creating finance document");
                Versioned::new(0, FinanceLedger::new(tenant_id))
            }
            None => return Err(DomainError::not_found("finance document").into()),
        };

        let out = op(&mut doc.value)?;
        doc.value.check_consistency()?;
        self.ledgers.replace(tenant_id, &doc).await?;
        Ok(out)
    }

    pub async fn ledger(&self, tenant_id: TenantId) -> ServiceResult<FinanceLedger> {
        self.load(tenant_id)
            .await?
            .map(|doc| doc.value)
            .ok_or_else(|| DomainError::not_found("finance document").into())
    }

    /// The transaction log; empty when nothing was ever recorded.
    pub async fn transactions(&self, tenant_id: TenantId) -> ServiceResult<Vec<Transaction>> {
        Ok(self
            .load(tenant_id)
            .await?
            .map(|doc| doc.value.transactions().to_vec())
            .unwrap_or_default())
    }

    pub async fn profit_loss(&self, tenant_id: TenantId) -> ServiceResult<ProfitLoss> {
        let ledger = self.ledger(tenant_id).await?;
        Ok(compute_profit_loss(&ledger))
    }

    #[instrument(skip(self, cmd), fields(entry_id = %cmd.entry_id))]
    pub async fn add_income(&self, tenant_id: TenantId, cmd: NewIncome) -> ServiceResult<IncomeEntry> {
        self.mutate(tenant_id, true, |ledger| ledger.add_income(cmd)).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_income(&self, tenant_id: TenantId, id: RecordId, patch: IncomePatch) -> ServiceResult<IncomeEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.update_income(id, patch)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_income(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<IncomeEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.delete_income(id)).await
    }

    #[instrument(skip(self, cmd), fields(entry_id = %cmd.entry_id))]
    pub async fn add_expense(&self, tenant_id: TenantId, cmd: NewExpense) -> ServiceResult<ExpenseEntry> {
        self.mutate(tenant_id, true, |ledger| ledger.add_expense(cmd)).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_expense(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: ExpensePatch,
    ) -> ServiceResult<ExpenseEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.update_expense(id, patch)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_expense(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<ExpenseEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.delete_expense(id)).await
    }

    #[instrument(skip(self, cmd), fields(entry_id = %cmd.entry_id))]
    pub async fn add_salary(&self, tenant_id: TenantId, cmd: NewSalary) -> ServiceResult<SalaryEntry> {
        self.mutate(tenant_id, true, |ledger| ledger.add_salary(cmd)).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_salary(&self, tenant_id: TenantId, id: RecordId, patch: SalaryPatch) -> ServiceResult<SalaryEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.update_salary(id, patch)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_salary(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<SalaryEntry> {
        self.mutate(tenant_id, false, |ledger| ledger.delete_salary(id)).await
    }
}
