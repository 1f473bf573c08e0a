//! The cart and its merge engine.

use pizzeria_core::{DomainError, DomainResult, Entity};

use crate::line_item::{LineItem, LineKey};
use crate::selection::Selection;

/// Ordered cart lines. No two lines share a [`LineKey`]; insertion order is
/// preserved and merges never move an existing line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
}

/// What a merge did to the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    pub incremented: usize,
    pub skipped: usize,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from possibly duplicated lines, consolidating lines with
    /// the same key into the first occurrence.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = LineItem>,
    {
        let mut cart = Cart::new();
        for line in lines {
            match cart.position(line.id()) {
                Some(idx) => {
                    if !cart.lines[idx].try_increment(line.quantity()) {
                        tracing::warn!(key = %line.key(), "dropping duplicate line: quantity overflow");
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, key: &LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.id() == key)
    }

    pub fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == key)
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Merge a batch of selections into a copy of this cart.
    ///
    /// `cart.merge(&[]) == cart`, and merging batch A then batch B equals
    /// merging A followed by B in one call.
    pub fn merge(&self, selections: &[Selection]) -> Cart {
        let mut merged = self.clone();
        merged.merge_in_place(selections);
        merged
    }

    /// Merge a batch of selections into this cart, in input order.
    ///
    /// - non-positive quantities are ignored
    /// - an existing `(id, category)` line has its quantity increased in place
    /// - otherwise a new line is appended
    pub fn merge_in_place(&mut self, selections: &[Selection]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for selection in selections {
            match self.absorb(selection) {
                Ok(Absorbed::Appended) => outcome.appended += 1,
                Ok(Absorbed::Incremented) => outcome.incremented += 1,
                Err(err) => {
                    tracing::debug!(
                        category = %selection.category,
                        id = %selection.item.id,
                        quantity = selection.quantity,
                        error = %err,
                        "selection skipped"
                    );
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }

    fn absorb(&mut self, selection: &Selection) -> DomainResult<Absorbed> {
        if selection.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let quantity = u32::try_from(selection.quantity)
            .map_err(|_| DomainError::validation("quantity too large"))?;

        let key = LineKey::new(selection.item.id, selection.category);
        match self.position(&key) {
            Some(idx) => {
                if self.lines[idx].try_increment(quantity) {
                    Ok(Absorbed::Incremented)
                } else {
                    tracing::warn!(%key, "quantity overflow; selection not merged");
                    Err(DomainError::invariant("line quantity overflow"))
                }
            }
            None => {
                let line = LineItem::from_catalog(&selection.item, selection.category, quantity)?;
                self.lines.push(line);
                Ok(Absorbed::Appended)
            }
        }
    }
}

enum Absorbed {
    Appended,
    Incremented,
}
