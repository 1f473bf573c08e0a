//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Money` is the
/// canonical example here: two amounts of 1 200.00 are the same amount no
/// matter which line item produced them.
///
/// ```ignore
/// let a = Money::from_minor(120_000);
/// let b = Money::from_major(1_200);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
