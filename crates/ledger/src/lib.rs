//! Ledger module (fungible-token balance store).
//!
//! Pure domain logic only: no IO, no clock, no persistence concerns. This is
//! the leaf component of the sale: it knows holders and balances and nothing
//! about prices, windows, or whitelists.

pub mod token;

pub use token::{Ledger, TokenInfo};
