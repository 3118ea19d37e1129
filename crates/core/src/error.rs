//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type SaleResult<T> = Result<T, SaleError>;

/// Domain-level error.
///
/// This taxonomy is closed and deterministic: every mutating operation either
/// commits in full or rejects with one of these variants, with no partial
/// state change. Variants carry structured data, not display text; turning a
/// rejection into user-facing copy is the presentation layer's job.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SaleError {
    /// The caller is not the administrator of an admin-only operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The sale is outside its time window or has been finalized.
    #[error("sale not open")]
    SaleNotOpen,

    /// The caller is not on the whitelist for a gated purchase path.
    #[error("not whitelisted")]
    NotWhitelisted,

    /// A zero amount, zero price, or unrepresentable quantity was supplied.
    #[error("invalid amount")]
    InvalidAmount,

    /// The attached payment does not equal the required payment exactly.
    #[error("incorrect payment: required {required}, attached {attached}")]
    IncorrectPayment { required: u128, attached: u128 },

    /// A ledger debit exceeds the holder's balance.
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: u128, requested: u128 },

    /// Finalize was called on an already-finalized sale.
    #[error("already finalized")]
    AlreadyFinalized,
}
