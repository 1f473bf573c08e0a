//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Numeric identifier of a catalog item, as issued by the catalog API.
///
/// Ids are only unique within a [`Category`]: a pizza and a beverage may share
/// the same number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::validation(format!("ItemId: {e}")))
    }
}

/// Menu category a catalog item is sold under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pizza,
    Topping,
    Beverage,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 3] = [Category::Pizza, Category::Topping, Category::Beverage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pizza => "pizza",
            Category::Topping => "topping",
            Category::Beverage => "beverage",
        }
    }

    /// Collection path segment used by the catalog API.
    pub fn collection(&self) -> &'static str {
        match self {
            Category::Pizza => "pizzas",
            Category::Topping => "toppings",
            Category::Beverage => "beverages",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pizza" | "pizzas" => Ok(Category::Pizza),
            "topping" | "toppings" => Ok(Category::Topping),
            "beverage" | "beverages" | "drink" | "drinks" => Ok(Category::Beverage),
            other => Err(DomainError::validation(format!("unknown category: {other}"))),
        }
    }
}

/// Identifier of a sale (one checkout from first item to confirmed payment).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(Uuid);

/// Number printed on an invoice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(SaleId, "SaleId");
impl_uuid_newtype!(InvoiceNumber, "InvoiceNumber");

impl InvoiceNumber {
    /// Short form printed on receipts (last 8 hex digits, upper case).
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        let tail = &simple[simple.len().saturating_sub(8)..];
        format!("INV-{}", tail.to_ascii_uppercase())
    }
}
