//! Decoding of the catalog API's `{ "data": [...] }` envelope.

use serde::Deserialize;
use serde_json::Value;

use pizzeria_core::Category;

use crate::client::CatalogError;
use crate::item::CatalogItem;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Decode a response body into catalog items.
///
/// - A body that is not an envelope is an error.
/// - `data: null` or a missing `data` field is an empty list.
/// - Items that fail to decode, have a negative price or a blank name are
///   skipped with a warning; the rest of the list survives.
pub fn decode_items(category: Category, body: &[u8]) -> Result<Vec<CatalogItem>, CatalogError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let raw = envelope.data.unwrap_or_default();
    let mut items = Vec::with_capacity(raw.len());

    for value in raw {
        let mut item: CatalogItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!(%category, error = %err, "skipping malformed catalog item");
                continue;
            }
        };

        if item.price.is_negative() {
            tracing::warn!(%category, id = %item.id, "skipping catalog item with negative price");
            continue;
        }
        if item.name.trim().is_empty() {
            tracing::warn!(%category, id = %item.id, "skipping catalog item without a name");
            continue;
        }

        // Sizeless categories come back as "" from some endpoints.
        item.size = item.size.filter(|s| !s.trim().is_empty());
        item.base_type = item.base_type.filter(|s| !s.trim().is_empty());
        items.push(item);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::{ItemId, Money};

    #[test]
    fn decodes_pizza_envelope() {
        let body = br#"{
            "success": true,
            "message": "Pizzas retrieved successfully",
            "data": [
                {"id": 1, "item_id": 10, "name": "Margherita", "size": "Large",
                 "base_type": "Thin", "price": 1200, "is_active": true,
                 "created_at": "2024-01-01T00:00:00Z", "deleted_at": null},
                {"id": 2, "name": "Veggie", "size": "Medium", "price": 999.5, "is_active": false}
            ]
        }"#;

        let items = decode_items(Category::Pizza, body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId(1));
        assert_eq!(items[0].price, Money::from_major(1200));
        assert_eq!(items[0].base_type.as_deref(), Some("Thin"));
        assert_eq!(items[1].price, Money::from_minor(99_950));
        assert!(!items[1].is_active);
    }

    #[test]
    fn toppings_without_size_decode_with_none() {
        let body = br#"{"data": [{"id": 5, "name": "Olives", "price": 100, "is_active": true},
                                 {"id": 6, "name": "Cheese", "size": "", "price": 150}]}"#;

        let items = decode_items(Category::Topping, body).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.size.is_none()));
        assert!(items[1].is_active);
    }

    #[test]
    fn null_data_is_empty() {
        assert!(decode_items(Category::Beverage, br#"{"data": null}"#).unwrap().is_empty());
        assert!(decode_items(Category::Beverage, br#"{"success": false}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_items_are_skipped_individually() {
        let body = br#"{"data": [
            {"id": 1, "name": "Cola", "price": 250, "size": "500ml"},
            {"id": "x", "name": "Broken", "price": 1},
            {"id": 3, "name": "Refund", "price": -5},
            {"id": 4, "name": "  ", "price": 10}
        ]}"#;

        let items = decode_items(Category::Beverage, body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Cola");
    }

    #[test]
    fn malformed_envelope_is_a_parse_error() {
        assert!(matches!(
            decode_items(Category::Pizza, b"<html>502</html>"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            decode_items(Category::Pizza, br#"{"data": {"id": 1}}"#),
            Err(CatalogError::Parse(_))
        ));
    }
}
