//! Cart persistence: the cart blob and the repository seam.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use pizzeria_core::{Category, ItemId, Money};

use crate::cart::Cart;
use crate::line_item::{LineItem, LineKey};
use crate::store::{KeyValueStore, StoreError};

/// Storage key of the cart blob (shared with the browser front-end).
pub const CART_KEY: &str = "cartItems";

/// Load/save of the session cart.
///
/// `load` never fails: a missing or unreadable blob is an empty cart.
pub trait CartRepository: Send + Sync {
    fn load(&self) -> Cart;
    fn save(&self, cart: &Cart) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError> {
        self.save(&Cart::new())
    }
}

impl<R> CartRepository for Arc<R>
where
    R: CartRepository + ?Sized,
{
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        (**self).save(cart)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Cart repository over any [`KeyValueStore`], storing the JSON blob under
/// [`CART_KEY`].
#[derive(Debug)]
pub struct StoredCartRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StoredCartRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> CartRepository for StoredCartRepository<S> {
    fn load(&self) -> Cart {
        match self.store.get(&self.key) {
            Ok(Some(blob)) => decode_cart(&blob),
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "cart storage unreadable; starting empty");
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        self.store.set(&self.key, &encode_cart(cart))?;
        tracing::info!(key = %self.key, lines = cart.len(), "cart saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)?;
        tracing::info!(key = %self.key, "cart cleared");
        Ok(())
    }
}

/// Wire shape of one cart entry: `{id, type, name, size?, price, quantity}`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    #[serde(alias = "pizzaId")]
    id: ItemId,
    #[serde(rename = "type")]
    category: Category,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    price: Money,
    #[serde(default)]
    quantity: i64,
}

impl From<&LineItem> for StoredLine {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.item_id(),
            category: line.category(),
            name: line.name().to_string(),
            size: line.size().map(str::to_string),
            price: line.price(),
            quantity: i64::from(line.quantity()),
        }
    }
}

impl StoredLine {
    fn into_line(self) -> Option<LineItem> {
        let quantity = u32::try_from(self.quantity).ok().filter(|q| *q > 0)?;
        LineItem::new(
            LineKey::new(self.id, self.category),
            self.name,
            self.size.filter(|s| !s.is_empty()),
            self.price,
            quantity,
        )
        .ok()
    }
}

/// Serialize a cart to its JSON array blob.
pub fn encode_cart(cart: &Cart) -> String {
    let lines: Vec<StoredLine> = cart.lines().iter().map(StoredLine::from).collect();
    // A Vec of plain structs with string keys always serializes.
    serde_json::to_string(&lines).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a cart blob leniently.
///
/// Not an array → empty cart. Entries that do not decode, or have no positive
/// quantity, are dropped. Duplicate keys are consolidated.
pub fn decode_cart(blob: &str) -> Cart {
    let entries: Vec<Value> = match serde_json::from_str(blob) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "cart blob is not a JSON array; starting empty");
            return Cart::new();
        }
    };

    let lines = entries.into_iter().filter_map(|entry| {
        match serde_json::from_value::<StoredLine>(entry) {
            Ok(stored) => {
                let line = stored.into_line();
                if line.is_none() {
                    tracing::warn!("dropping stored cart line without a positive quantity");
                }
                line
            }
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed stored cart line");
                None
            }
        }
    });

    Cart::from_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use crate::store::InMemoryStore;
    use pizzeria_catalog::CatalogItem;

    fn sample_cart() -> Cart {
        Cart::new().merge(&[
            Selection::new(
                CatalogItem::new(1, "Margherita", Money::from_major(1200)).with_size("Large"),
                Category::Pizza,
                2,
            ),
            Selection::new(
                CatalogItem::new(5, "Olives", Money::from_minor(33_333)),
                Category::Topping,
                1,
            ),
        ])
    }

    #[test]
    fn encode_uses_front_end_field_names() {
        let blob = encode_cart(&sample_cart());
        assert_eq!(
            blob,
            r#"[{"id":1,"type":"pizza","name":"Margherita","size":"Large","price":1200,"quantity":2},{"id":5,"type":"topping","name":"Olives","price":333.33,"quantity":1}]"#
        );
    }

    #[test]
    fn repository_round_trips_through_store() {
        let repo = StoredCartRepository::new(InMemoryStore::new());
        assert!(repo.load().is_empty());

        let cart = sample_cart();
        repo.save(&cart).unwrap();
        assert_eq!(repo.load(), cart);

        repo.clear().unwrap();
        assert!(repo.load().is_empty());
    }

    #[test]
    fn unparsable_blob_loads_as_empty_cart() {
        let store = InMemoryStore::new();
        store.set(CART_KEY, "{not json").unwrap();
        let repo = StoredCartRepository::new(store);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn legacy_and_partial_entries_are_normalized() {
        let blob = r#"[
            {"pizzaId": 1, "type": "pizza", "name": "Margherita", "size": "Large", "price": 1200, "quantity": 1},
            {"id": 1, "type": "pizza", "name": "Margherita", "size": "Large", "price": 1200, "quantity": 2},
            {"type": "beverage", "name": "No id", "price": 250, "quantity": 1},
            {"id": 7, "type": "beverage", "name": "Zero", "price": 250, "quantity": 0},
            {"id": 5, "type": "topping", "name": "Olives", "size": "", "price": 100, "quantity": 1}
        ]"#;

        let cart = decode_cart(blob);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].quantity(), 3);
        assert_eq!(cart.lines()[1].size(), None);
    }
}
