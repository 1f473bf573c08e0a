//! Cart module: line items, the merge engine and cart persistence.
//!
//! Merging is pure domain logic (no IO). Persistence sits behind the
//! [`CartRepository`] seam so callers decide where the cart blob lives.

pub mod cart;
pub mod line_item;
pub mod repository;
pub mod selection;
pub mod store;

pub use cart::{Cart, MergeOutcome};
pub use line_item::{LineItem, LineKey};
pub use repository::{CART_KEY, CartRepository, StoredCartRepository, decode_cart, encode_cart};
pub use selection::{MAX_PICK_QUANTITY, Selection, SelectionSheet};
pub use store::{FileStore, InMemoryStore, KeyValueStore, StoreError};
