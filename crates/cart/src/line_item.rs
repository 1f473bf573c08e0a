use pizzeria_catalog::CatalogItem;
use pizzeria_core::{Category, DomainError, DomainResult, Entity, ItemId, Money};

/// Merge identity of a cart line: numeric id scoped by category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub id: ItemId,
    pub category: Category,
}

impl LineKey {
    pub fn new(id: impl Into<ItemId>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
        }
    }
}

impl core::fmt::Display for LineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}", self.category, self.id)
    }
}

/// One cart entry. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    key: LineKey,
    name: String,
    size: Option<String>,
    price: Money,
    quantity: u32,
}

impl LineItem {
    pub fn new(
        key: LineKey,
        name: impl Into<String>,
        size: Option<String>,
        price: Money,
        quantity: u32,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        if price.is_negative() {
            return Err(DomainError::validation("line price must not be negative"));
        }
        Ok(Self {
            key,
            name: name.into(),
            size,
            price,
            quantity,
        })
    }

    /// Line for a freshly selected catalog item.
    pub fn from_catalog(
        item: &CatalogItem,
        category: Category,
        quantity: u32,
    ) -> DomainResult<Self> {
        Self::new(
            LineKey::new(item.id, category),
            item.name.clone(),
            item.size.clone(),
            item.price,
            quantity,
        )
    }

    pub fn key(&self) -> LineKey {
        self.key
    }

    pub fn item_id(&self) -> ItemId {
        self.key.id
    }

    pub fn category(&self) -> Category {
        self.key.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity`; `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }

    /// Receipt label: `Margherita (Large)` or `Olives`.
    pub fn label(&self) -> String {
        match &self.size {
            Some(size) => format!("{} ({})", self.name, size),
            None => self.name.clone(),
        }
    }

    /// Add to the quantity; `false` (and no change) on overflow.
    pub(crate) fn try_increment(&mut self, by: u32) -> bool {
        match self.quantity.checked_add(by) {
            Some(quantity) => {
                self.quantity = quantity;
                true
            }
            None => false,
        }
    }
}

impl Entity for LineItem {
    type Id = LineKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}
