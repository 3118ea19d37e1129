//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are the same value. `TimeWindow` and the token
/// metadata are the canonical examples here; entities with identity
/// (`Ledger`, `SaleEngine`) are not value objects.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
