//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Cart line items are entities: a line keeps its identity while its quantity
/// changes through merges.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
