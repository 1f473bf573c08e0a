use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{DomainError, DomainResult, InvoiceNumber, Money, SaleId};

use crate::checkout::Checkout;
use crate::invoice::Invoice;

pub const THANK_YOU: &str = "Thank you for your business!";

/// Customer details captured at the counter. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub telephone: Option<String>,
}

impl CustomerDetails {
    pub fn new(name: Option<String>, telephone: Option<String>) -> Self {
        Self {
            name: non_blank(name),
            telephone: non_blank(telephone),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = non_blank(Some(name.into()));
    }

    pub fn set_telephone(&mut self, telephone: impl Into<String>) {
        self.telephone = non_blank(Some(telephone.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.telephone.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub label: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// Printable snapshot of a confirmed sale.
///
/// Built only from a non-empty invoice whose checkout is confirmed; printers
/// render it and never recompute amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub invoice_number: InvoiceNumber,
    pub sale_id: SaleId,
    pub customer: CustomerDetails,
    pub printed_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub tax_rate_bps: u32,
    pub tax_rate_label: String,
    pub tax: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub balance: Money,
    pub footer: Option<String>,
}

impl Receipt {
    pub fn prepare(
        invoice: &Invoice,
        checkout: &Checkout,
        customer: &CustomerDetails,
        invoice_number: InvoiceNumber,
        printed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if invoice.is_empty() {
            return Err(DomainError::validation("cannot print a receipt for an empty cart"));
        }
        let confirmed = checkout.confirmation().ok_or_else(|| {
            DomainError::validation("payment must be confirmed before printing")
        })?;
        if invoice.total() != confirmed.total {
            return Err(DomainError::invariant(format!(
                "invoice total {} differs from confirmed total {}",
                invoice.total(),
                confirmed.total
            )));
        }

        let lines = invoice
            .lines()
            .iter()
            .map(|line| ReceiptLine {
                label: line.label.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total: line.line_total,
            })
            .collect();

        let footer = (!confirmed.change.is_negative()).then(|| THANK_YOU.to_string());

        Ok(Self {
            invoice_number,
            sale_id: confirmed.sale_id,
            customer: customer.clone(),
            printed_at,
            lines,
            subtotal: invoice.subtotal(),
            tax_rate_bps: invoice.tax_rate_bps(),
            tax_rate_label: invoice.tax_rate_label(),
            tax: invoice.tax(),
            total: confirmed.total,
            amount_paid: confirmed.amount_paid,
            balance: confirmed.change,
            footer,
        })
    }

    /// Sum of line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}
