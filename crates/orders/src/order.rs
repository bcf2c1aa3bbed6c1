use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizdesk_core::validate::{normalize_email, require_non_negative, require_text};
use bizdesk_core::{AggregateRoot, DomainError, DomainResult, Entity, RecordId, WasteType};

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// Aggregate root: Order.
///
/// Linked to a supplier only by `email`; there is no supplier id on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: RecordId,
    waste_type: WasteType,
    quantity: Decimal,
    amount: Decimal,
    address: String,
    phone_number: String,
    email: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    pub waste_type: WasteType,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderPatch {
    pub waste_type: Option<WasteType>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub status: Option<OrderStatus>,
}

impl Order {
    pub fn place(id: RecordId, cmd: NewOrder, created_at: DateTime<Utc>) -> DomainResult<Self> {
        require_non_negative("quantity", cmd.quantity)?;
        require_non_negative("amount", cmd.amount)?;
        require_text("address", &cmd.address)?;
        require_text("phone_number", &cmd.phone_number)?;
        let email = normalize_email(&cmd.email)?;

        Ok(Self {
            id,
            waste_type: cmd.waste_type,
            quantity: cmd.quantity,
            amount: cmd.amount,
            address: cmd.address,
            phone_number: cmd.phone_number,
            email,
            status: OrderStatus::Pending,
            created_at,
        })
    }

    pub fn apply_patch(&mut self, patch: OrderPatch) -> DomainResult<()> {
        if let Some(quantity) = patch.quantity {
            require_non_negative("quantity", quantity)?;
        }
        if let Some(amount) = patch.amount {
            require_non_negative("amount", amount)?;
        }
        if let Some(address) = &patch.address {
            require_text("address", address)?;
        }
        if let Some(phone) = &patch.phone_number {
            require_text("phone_number", phone)?;
        }
        if let Some(status) = patch.status {
            self.ensure_transition(status)?;
        }
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        if let Some(waste_type) = patch.waste_type {
            self.waste_type = waste_type;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone) = patch.phone_number {
            self.phone_number = phone;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }

    /// Move the order to `next`. Delivered and cancelled orders are final.
    pub fn set_status(&mut self, next: OrderStatus) -> DomainResult<()> {
        self.ensure_transition(next)?;
        self.status = next;
        Ok(())
    }

    fn ensure_transition(&self, next: OrderStatus) -> DomainResult<()> {
        if self.status == next || !self.status.is_terminal() {
            return Ok(());
        }
        Err(DomainError::validation(format!(
            "order is already {:?}, cannot change to {next:?}",
            self.status
        )))
    }

    pub fn waste_type(&self) -> WasteType {
        self.waste_type
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Order {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl AggregateRoot for Order {
    const COLLECTION: &'static str = "orders";

    fn document_id(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn order(email: &str, amount: Decimal, status: OrderStatus) -> Order {
        let mut order = Order::place(
            RecordId::new(),
            NewOrder {
                waste_type: WasteType::Plastic,
                quantity: dec!(5),
                amount,
                address: "12 Temple Rd".to_string(),
                phone_number: "0112345678".to_string(),
                email: email.to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        order.set_status(status).unwrap();
        order
    }

    #[test]
    fn new_orders_are_pending() {
        let order = order("Buyer@Example.com", dec!(100), OrderStatus::Pending);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.email(), "buyer@example.com");
    }

    #[test]
    fn delivered_orders_cannot_be_cancelled() {
        let mut order = order("b@example.com", dec!(100), OrderStatus::Delivered);
        let err = order.set_status(OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        order.set_status(OrderStatus::Delivered).unwrap();
    }

    #[test]
    fn patch_with_bad_status_changes_nothing() {
        let mut order = order("b@example.com", dec!(100), OrderStatus::Cancelled);
        let before = order.clone();
        let err = order
            .apply_patch(OrderPatch {
                amount: Some(dec!(1)),
                status: Some(OrderStatus::Pending),
                ..OrderPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(order, before);
    }

    #[test]
    fn status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Delivered).unwrap(),
            serde_json::json!("Delivered")
        );
    }
}
