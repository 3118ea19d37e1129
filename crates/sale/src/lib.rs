//! Sale module (fixed-supply token crowdsale engine).
//!
//! Pure domain logic only: no IO, no ambient clock, no persistence concerns.
//! The engine owns the [`crowdgate_ledger::Ledger`] it sells from, enforces
//! pricing, time-window, whitelist, and finalization rules, and appends a
//! tagged record to its event log for every purchase, price change, and
//! finalization.

pub mod engine;
pub mod event;

pub use engine::{SaleConfig, SaleEngine, SaleState, Settlement};
pub use event::{Buy, Finalize, PriceUpdated, SaleEvent};
