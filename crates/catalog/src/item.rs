use serde::{Deserialize, Serialize};

use pizzeria_core::{Category, ItemId, Money};

fn default_active() -> bool {
    true
}

/// A sellable menu entry (pizza, topping or beverage).
///
/// The item itself does not know its category; the category comes from the
/// endpoint it was fetched from and is attached at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    /// Unit price; never negative.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Crust/base type (pizzas only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CatalogItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            size: None,
            base_type: None,
            is_active: true,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Menu label: `Margherita (Large, Thin)`, `Cola (500ml)` or just `Olives`.
    pub fn label(&self) -> String {
        let details: Vec<&str> = [self.size.as_deref(), self.base_type.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if details.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, details.join(", "))
        }
    }
}

/// Menu snapshot for all categories, fetched once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pizzas: Vec<CatalogItem>,
    toppings: Vec<CatalogItem>,
    beverages: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, category: Category, items: Vec<CatalogItem>) -> Self {
        self.set_items(category, items);
        self
    }

    pub fn set_items(&mut self, category: Category, items: Vec<CatalogItem>) {
        match category {
            Category::Pizza => self.pizzas = items,
            Category::Topping => self.toppings = items,
            Category::Beverage => self.beverages = items,
        }
    }

    pub fn items(&self, category: Category) -> &[CatalogItem] {
        match category {
            Category::Pizza => &self.pizzas,
            Category::Topping => &self.toppings,
            Category::Beverage => &self.beverages,
        }
    }

    pub fn find(&self, category: Category, id: ItemId) -> Option<&CatalogItem> {
        self.items(category).iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.pizzas.len() + self.toppings.len() + self.beverages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_size_when_present() {
        let pizza = CatalogItem::new(1, "Margherita", Money::from_major(1200)).with_size("Large");
        assert_eq!(pizza.label(), "Margherita (Large)");

        let topping = CatalogItem::new(5, "Olives", Money::from_major(100));
        assert_eq!(topping.label(), "Olives");
    }

    #[test]
    fn label_includes_base_type_after_size() {
        let thin = CatalogItem {
            base_type: Some("Thin".into()),
            ..CatalogItem::new(1, "Margherita", Money::from_major(1200)).with_size("Large")
        };
        assert_eq!(thin.label(), "Margherita (Large, Thin)");

        let sizeless = CatalogItem {
            base_type: Some("Pan".into()),
            ..CatalogItem::new(2, "Fajita", Money::from_major(1400))
        };
        assert_eq!(sizeless.label(), "Fajita (Pan)");
    }

    #[test]
    fn find_is_scoped_by_category() {
        let catalog = Catalog::new()
            .with_items(
                Category::Pizza,
                vec![CatalogItem::new(1, "Margherita", Money::from_major(1200))],
            )
            .with_items(
                Category::Beverage,
                vec![CatalogItem::new(1, "Cola", Money::from_major(250))],
            );

        assert_eq!(catalog.find(Category::Pizza, ItemId(1)).unwrap().name, "Margherita");
        assert_eq!(catalog.find(Category::Beverage, ItemId(1)).unwrap().name, "Cola");
        assert!(catalog.find(Category::Topping, ItemId(1)).is_none());
        assert_eq!(catalog.len(), 2);
    }
}
