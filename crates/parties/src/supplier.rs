use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizdesk_core::validate::{normalize_email, require_non_negative, require_text};
use bizdesk_core::{AggregateRoot, DomainError, DomainResult, Entity, RecordId};

/// Supplier approval lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Pending,
    Approved,
    Rejected,
}

/// Aggregate root: Supplier.
///
/// `email` is unique per tenant and is also the key orders are matched on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: RecordId,
    supplier_name: String,
    supplier_product: String,
    quantity: Decimal,
    amount: Decimal,
    email: String,
    status: SupplierStatus,
}

/// Command: RegisterSupplier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterSupplier {
    pub supplier_name: String,
    pub supplier_product: String,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub email: String,
}

/// Command: partial edit of supplier details (status has its own commands).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupplierPatch {
    pub supplier_name: Option<String>,
    pub supplier_product: Option<String>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub email: Option<String>,
}

impl Supplier {
    /// New suppliers start out pending review.
    pub fn register(id: RecordId, cmd: RegisterSupplier) -> DomainResult<Self> {
        require_text("supplier_name", &cmd.supplier_name)?;
        require_text("supplier_product", &cmd.supplier_product)?;
        require_non_negative("quantity", cmd.quantity)?;
        require_non_negative("amount", cmd.amount)?;
        let email = normalize_email(&cmd.email)?;

        Ok(Self {
            id,
            supplier_name: cmd.supplier_name,
            supplier_product: cmd.supplier_product,
            quantity: cmd.quantity,
            amount: cmd.amount,
            email,
            status: SupplierStatus::Pending,
        })
    }

    pub fn apply_patch(&mut self, patch: SupplierPatch) -> DomainResult<()> {
        if let Some(name) = &patch.supplier_name {
            require_text("supplier_name", name)?;
        }
        if let Some(product) = &patch.supplier_product {
            require_text("supplier_product", product)?;
        }
        if let Some(quantity) = patch.quantity {
            require_non_negative("quantity", quantity)?;
        }
        if let Some(amount) = patch.amount {
            require_non_negative("amount", amount)?;
        }
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        if let Some(name) = patch.supplier_name {
            self.supplier_name = name;
        }
        if let Some(product) = patch.supplier_product {
            self.supplier_product = product;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(email) = email {
            self.email = email;
        }
        Ok(())
    }

    /// Approve a pending supplier. Approving twice is a no-op.
    pub fn approve(&mut self) -> DomainResult<()> {
        self.decide(SupplierStatus::Approved)
    }

    /// Reject a pending supplier. Rejecting twice is a no-op.
    pub fn reject(&mut self) -> DomainResult<()> {
        self.decide(SupplierStatus::Rejected)
    }

    fn decide(&mut self, decision: SupplierStatus) -> DomainResult<()> {
        match self.status {
            SupplierStatus::Pending => {
                self.status = decision;
                Ok(())
            }
            current if current == decision => Ok(()),
            current => Err(DomainError::validation(format!(
                "supplier already {current:?}, cannot change to {decision:?}"
            ))),
        }
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn supplier_product(&self) -> &str {
        &self.supplier_product
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> SupplierStatus {
        self.status
    }
}

impl Entity for Supplier {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl AggregateRoot for Supplier {
    const COLLECTION: &'static str = "suppliers";

    fn document_id(&self) -> String {
        self.id.to_string()
    }
}
