use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{Aggregate, AggregateRoot, DomainError, Money, SaleId};

use crate::invoice::Invoice;

/// Payment lifecycle of a sale. There is no way back from `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unconfirmed,
    Confirmed,
}

/// Aggregate root: Checkout (payment confirmation of one sale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    id: SaleId,
    status: PaymentStatus,
    confirmation: Option<PaymentConfirmed>,
    version: u64,
}

impl Checkout {
    pub fn new(id: SaleId) -> Self {
        Self {
            id,
            status: PaymentStatus::Unconfirmed,
            confirmation: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SaleId {
        self.id
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmed
    }

    /// Details recorded when payment was confirmed.
    pub fn confirmation(&self) -> Option<&PaymentConfirmed> {
        self.confirmation.as_ref()
    }

    /// Confirm payment for `invoice`, re-evaluating `amount_paid >= total`
    /// against the invoice as it is now.
    pub fn confirm(
        &mut self,
        invoice: &Invoice,
        occurred_at: DateTime<Utc>,
    ) -> Result<PaymentStatus, DomainError> {
        let command = CheckoutCommand::ConfirmPayment(ConfirmPayment {
            sale_id: self.id,
            amount_paid: invoice.amount_paid(),
            total: invoice.total(),
            occurred_at,
        });
        self.execute(&command)?;
        Ok(self.status)
    }
}

impl AggregateRoot for Checkout {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: ConfirmPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPayment {
    pub sale_id: SaleId,
    pub amount_paid: Money,
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutCommand {
    ConfirmPayment(ConfirmPayment),
}

/// Event: PaymentConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmed {
    pub sale_id: SaleId,
    pub amount_paid: Money,
    pub total: Money,
    /// Change due to the customer (`amount_paid - total`, never negative).
    pub change: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutEvent {
    PaymentConfirmed(PaymentConfirmed),
}

impl CheckoutEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CheckoutEvent::PaymentConfirmed(_) => "billing.checkout.payment_confirmed",
        }
    }
}

impl Aggregate for Checkout {
    type Command = CheckoutCommand;
    type Event = CheckoutEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CheckoutEvent::PaymentConfirmed(e) => {
                self.status = PaymentStatus::Confirmed;
                self.confirmation = Some(e.clone());
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CheckoutCommand::ConfirmPayment(cmd) => self.handle_confirm(cmd),
        }
    }
}

impl Checkout {
    fn handle_confirm(&self, cmd: &ConfirmPayment) -> Result<Vec<CheckoutEvent>, DomainError> {
        if cmd.sale_id != self.id {
            return Err(DomainError::invariant("sale_id mismatch"));
        }

        // Already confirmed: accepted, nothing new happens.
        if self.status == PaymentStatus::Confirmed {
            return Ok(vec![]);
        }

        if cmd.amount_paid < cmd.total {
            return Err(DomainError::insufficient_payment(cmd.amount_paid, cmd.total));
        }

        let change = cmd
            .amount_paid
            .checked_sub(cmd.total)
            .ok_or_else(|| DomainError::invariant("change overflow"))?;

        Ok(vec![CheckoutEvent::PaymentConfirmed(PaymentConfirmed {
            sale_id: cmd.sale_id,
            amount_paid: cmd.amount_paid,
            total: cmd.total,
            change,
            occurred_at: cmd.occurred_at,
        })])
    }
}
