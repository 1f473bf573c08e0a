use std::collections::BTreeMap;

use pizzeria_catalog::CatalogItem;
use pizzeria_core::{Category, DomainError, DomainResult, ItemId};

/// Highest quantity the menu picker offers for a single item.
pub const MAX_PICK_QUANTITY: u32 = 10;

/// A catalog item picked for the cart, with its category attached at the
/// call boundary.
///
/// `quantity` is the raw pick; the merge engine ignores non-positive values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item: CatalogItem,
    pub category: Category,
    pub quantity: i64,
}

impl Selection {
    pub fn new(item: CatalogItem, category: Category, quantity: i64) -> Self {
        Self {
            item,
            category,
            quantity,
        }
    }
}

/// Checked items and chosen quantities on one category's menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSheet {
    category: Category,
    picks: BTreeMap<ItemId, u32>,
}

impl SelectionSheet {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            picks: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Tick an item. New picks start at quantity 1; re-checking keeps the
    /// current quantity.
    pub fn check(&mut self, item: &CatalogItem) -> DomainResult<()> {
        if !item.is_active {
            return Err(DomainError::validation(format!(
                "{} {} is not available",
                self.category, item.name
            )));
        }
        self.picks.entry(item.id).or_insert(1);
        Ok(())
    }

    /// Untick an item; returns whether it was checked.
    pub fn uncheck(&mut self, id: ItemId) -> bool {
        self.picks.remove(&id).is_some()
    }

    pub fn set_quantity(&mut self, id: ItemId, quantity: u32) -> DomainResult<()> {
        if !(1..=MAX_PICK_QUANTITY).contains(&quantity) {
            return Err(DomainError::validation(format!(
                "quantity must be between 1 and {MAX_PICK_QUANTITY}"
            )));
        }
        match self.picks.get_mut(&id) {
            Some(current) => {
                *current = quantity;
                Ok(())
            }
            None => Err(DomainError::validation(format!(
                "{} {id} is not selected",
                self.category
            ))),
        }
    }

    pub fn quantity(&self, id: ItemId) -> Option<u32> {
        self.picks.get(&id).copied()
    }

    pub fn is_checked(&self, id: ItemId) -> bool {
        self.picks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    /// Picks as selections, in catalog order. Picks whose item is no longer in
    /// `items` are dropped.
    pub fn selections(&self, items: &[CatalogItem]) -> Vec<Selection> {
        items
            .iter()
            .filter_map(|item| {
                self.picks
                    .get(&item.id)
                    .map(|&qty| Selection::new(item.clone(), self.category, i64::from(qty)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::Money;

    fn menu() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new(1, "Cola", Money::from_major(250)).with_size("500ml"),
            CatalogItem::new(2, "Lime Juice", Money::from_major(300)),
            CatalogItem::new(3, "Iced Tea", Money::from_major(280)).inactive(),
        ]
    }

    #[test]
    fn check_starts_at_one_and_keeps_existing_quantity() {
        let items = menu();
        let mut sheet = SelectionSheet::new(Category::Beverage);

        sheet.check(&items[0]).unwrap();
        assert_eq!(sheet.quantity(ItemId(1)), Some(1));

        sheet.set_quantity(ItemId(1), 4).unwrap();
        sheet.check(&items[0]).unwrap();
        assert_eq!(sheet.quantity(ItemId(1)), Some(4));
    }

    #[test]
    fn inactive_items_cannot_be_checked() {
        let items = menu();
        let mut sheet = SelectionSheet::new(Category::Beverage);
        assert!(sheet.check(&items[2]).is_err());
        assert!(sheet.is_empty());
    }

    #[test]
    fn quantity_is_bounded_and_requires_a_pick() {
        let items = menu();
        let mut sheet = SelectionSheet::new(Category::Beverage);

        assert!(sheet.set_quantity(ItemId(2), 2).is_err());

        sheet.check(&items[1]).unwrap();
        assert!(sheet.set_quantity(ItemId(2), 0).is_err());
        assert!(sheet.set_quantity(ItemId(2), MAX_PICK_QUANTITY + 1).is_err());
        sheet.set_quantity(ItemId(2), MAX_PICK_QUANTITY).unwrap();
        assert_eq!(sheet.quantity(ItemId(2)), Some(MAX_PICK_QUANTITY));
    }

    #[test]
    fn selections_follow_catalog_order_and_drop_unknown_ids() {
        let items = menu();
        let mut sheet = SelectionSheet::new(Category::Beverage);

        sheet.check(&items[1]).unwrap();
        sheet.check(&items[0]).unwrap();
        sheet.set_quantity(ItemId(1), 2).unwrap();

        let selections = sheet.selections(&items);
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].item.id, ItemId(1));
        assert_eq!(selections[0].quantity, 2);
        assert_eq!(selections[1].item.id, ItemId(2));
        assert!(selections.iter().all(|s| s.category == Category::Beverage));

        assert_eq!(sheet.selections(&items[2..]).len(), 0);
    }

    #[test]
    fn uncheck_removes_pick() {
        let items = menu();
        let mut sheet = SelectionSheet::new(Category::Beverage);
        sheet.check(&items[0]).unwrap();

        assert!(sheet.uncheck(ItemId(1)));
        assert!(!sheet.uncheck(ItemId(1)));
        assert!(!sheet.is_checked(ItemId(1)));
    }
}
