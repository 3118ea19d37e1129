//! Aggregate root trait for the domain models.

/// Aggregate root marker + minimal interface.
///
/// Intentionally small: the ledger and the sale engine mutate state directly
/// (check every precondition, then commit), so all an aggregate root owes the
/// outside world is its identity and a monotone revision counter.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Bumped once per committed mutation; rejected operations leave it
    /// untouched, which makes it a cheap probe for "did anything change".
    fn version(&self) -> u64;
}
