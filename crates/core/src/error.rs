//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, rejected transitions). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A requested resource was not found (domain-level).
    #[error("not found: {0}")]
    NotFound(String),

    /// Payment confirmation attempted while the tendered amount is short.
    #[error("insufficient payment: paid {paid}, total {total}")]
    InsufficientPayment { paid: Money, total: Money },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn insufficient_payment(paid: Money, total: Money) -> Self {
        Self::InsufficientPayment { paid, total }
    }

    /// Shortfall for an insufficient payment rejection.
    pub fn shortfall(&self) -> Option<Money> {
        match self {
            Self::InsufficientPayment { paid, total } => total.checked_sub(*paid),
            _ => None,
        }
    }
}
