use std::sync::Arc;

use tracing::{info, instrument};

use bizdesk_core::{Entity, RecordId, TenantId};
use bizdesk_parties::{Employee, EmployeePatch, NewEmployee};

use super::{claim_unique, load_or_not_found, release_unique, remove_or_not_found, ServiceResult};
use crate::store::{Collection, DocumentStore, UniqueIndex};

const STAFF_NUMBER_CLAIMS: &str = "employee_staff_numbers";

#[derive(Clone)]
pub struct EmployeeService {
    employees: Collection<Employee>,
    staff_numbers: UniqueIndex,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            employees: Collection::new(Arc::clone(&store)),
            staff_numbers: UniqueIndex::new(store, STAFF_NUMBER_CLAIMS),
        }
    }

    async fn claim_staff_number(&self, tenant_id: TenantId, employee: &Employee) -> ServiceResult<()> {
        claim_unique(
            &self.staff_numbers,
            &self.employees,
            tenant_id,
            "employee_id",
            employee.employee_id(),
            employee.id(),
            Employee::employee_id,
        )
        .await
    }

    #[instrument(skip(self, cmd))]
    pub async fn hire(&self, tenant_id: TenantId, cmd: NewEmployee) -> ServiceResult<Employee> {
        let employee = Employee::hire(RecordId::new(), cmd)?;
        self.claim_staff_number(tenant_id, &employee).await?;
        if let Err(e) = self.employees.insert(tenant_id, &employee).await {
            release_unique(&self.staff_numbers, tenant_id, employee.employee_id(), employee.id()).await;
            return Err(e.into());
        }
        info!(record_id = %employee.id(), "employee added");
        Ok(employee)
    }

    pub async fn list(&self, tenant_id: TenantId) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.values(tenant_id).await?)
    }

    pub async fn get(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Employee> {
        Ok(load_or_not_found(&self.employees, tenant_id, id, "employee").await?.value)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, tenant_id: TenantId, id: RecordId, patch: EmployeePatch) -> ServiceResult<Employee> {
        let mut doc = load_or_not_found(&self.employees, tenant_id, id, "employee").await?;
        let old_staff_number = doc.value.employee_id().to_string();

        doc.value.apply_patch(patch)?;
        let renumbered = doc.value.employee_id() != old_staff_number;
        if renumbered {
            self.claim_staff_number(tenant_id, &doc.value).await?;
        }
        if let Err(e) = self.employees.replace(tenant_id, &doc).await {
            if renumbered {
                release_unique(&self.staff_numbers, tenant_id, doc.value.employee_id(), id).await;
            }
            return Err(e.into());
        }
        if renumbered {
            release_unique(&self.staff_numbers, tenant_id, &old_staff_number, id).await;
        }
        Ok(doc.value)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, tenant_id: TenantId, id: RecordId) -> ServiceResult<Employee> {
        let employee = remove_or_not_found(&self.employees, tenant_id, id, "employee").await?;
        release_unique(&self.staff_numbers, tenant_id, employee.employee_id(), id).await;
        Ok(employee)
    }
}
