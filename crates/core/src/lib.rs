//! `pizzeria-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! money in minor units, catalog identity, and the shared error model.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{Category, InvoiceNumber, ItemId, SaleId};
pub use money::{Money, MoneyParseError};
pub use value_object::ValueObject;
