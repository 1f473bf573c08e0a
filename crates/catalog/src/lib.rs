//! Catalog module: menu items as served by the external catalog API.
//!
//! The catalog is read-only from the point of view of the POS. Decoding is
//! lenient by design of the boundary: a malformed response means "no items",
//! never a failure that reaches cart or billing logic.

pub mod client;
pub mod envelope;
pub mod item;

pub use client::{CatalogClient, CatalogError};
pub use envelope::decode_items;
pub use item::{Catalog, CatalogItem};
