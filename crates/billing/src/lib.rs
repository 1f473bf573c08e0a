//! Billing module: invoice arithmetic, payment confirmation and the receipt
//! handed to the print collaborator.
//!
//! Implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod checkout;
pub mod invoice;
pub mod receipt;
pub mod tender;

pub use checkout::{
    Checkout, CheckoutCommand, CheckoutEvent, ConfirmPayment, PaymentConfirmed, PaymentStatus,
};
pub use invoice::{Invoice, InvoiceLine, TAX_RATE_BPS, compute_invoice};
pub use receipt::{CustomerDetails, Receipt, ReceiptLine, THANK_YOU};
pub use tender::{TenderError, parse_tendered};
