use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizdesk_core::validate::{normalize_email, require_non_negative, require_text};
use bizdesk_core::{AggregateRoot, DomainResult, Entity, RecordId};

/// Salary figures as entered on the employee form.
///
/// `overtime_payment`, `epf_etf` and `net_salary` are derived by the client and
/// stored as given; they are not recomputed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayDetails {
    pub basic_salary: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub overtime_hours: Decimal,
    #[serde(default)]
    pub overtime_payment: Decimal,
    #[serde(default)]
    pub epf_etf: Decimal,
    #[serde(default)]
    pub net_salary: Decimal,
}

impl PayDetails {
    fn validate(&self) -> DomainResult<()> {
        require_non_negative("basic_salary", self.basic_salary)?;
        require_non_negative("bonus", self.bonus)?;
        require_non_negative("overtime_hours", self.overtime_hours)?;
        require_non_negative("overtime_payment", self.overtime_payment)?;
        require_non_negative("epf_etf", self.epf_etf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: RecordId,
    name: String,
    department_name: String,
    /// Company-issued staff number, unique per tenant.
    employee_id: String,
    phone_number: String,
    email: String,
    job_role: String,
    #[serde(flatten)]
    pay: PayDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub department_name: String,
    pub employee_id: String,
    pub phone_number: String,
    pub email: String,
    pub job_role: String,
    #[serde(flatten)]
    pub pay: PayDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub department_name: Option<String>,
    pub employee_id: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub job_role: Option<String>,
    /// Replaces all pay figures at once, since they are derived together.
    pub pay: Option<PayDetails>,
}

impl Employee {
    pub fn hire(id: RecordId, cmd: NewEmployee) -> DomainResult<Self> {
        require_text("name", &cmd.name)?;
        require_text("employee_id", &cmd.employee_id)?;
        let email = normalize_email(&cmd.email)?;
        cmd.pay.validate()?;

        Ok(Self {
            id,
            name: cmd.name,
            department_name: cmd.department_name,
            employee_id: cmd.employee_id.trim().to_string(),
            phone_number: cmd.phone_number,
            email,
            job_role: cmd.job_role,
            pay: cmd.pay,
        })
    }

    pub fn apply_patch(&mut self, patch: EmployeePatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(employee_id) = &patch.employee_id {
            require_text("employee_id", employee_id)?;
        }
        if let Some(pay) = &patch.pay {
            pay.validate()?;
        }
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(department) = patch.department_name {
            self.department_name = department;
        }
        if let Some(employee_id) = patch.employee_id {
            self.employee_id = employee_id.trim().to_string();
        }
        if let Some(phone) = patch.phone_number {
            self.phone_number = phone;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(role) = patch.job_role {
            self.job_role = role;
        }
        if let Some(pay) = patch.pay {
            self.pay = pay;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn department_name(&self) -> &str {
        &self.department_name
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn job_role(&self) -> &str {
        &self.job_role
    }

    pub fn pay(&self) -> &PayDetails {
        &self.pay
    }
}

impl Entity for Employee {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl AggregateRoot for Employee {
    const COLLECTION: &'static str = "employees";

    fn document_id(&self) -> String {
        self.id.to_string()
    }
}
