//! `crowdgate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the sale error taxonomy, strongly-typed identifiers, and the small traits
//! the domain crates build on.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;
pub mod window;

pub use aggregate::AggregateRoot;
pub use error::{SaleError, SaleResult};
pub use id::{EngineId, HolderId, LedgerId};
pub use value_object::ValueObject;
pub use window::TimeWindow;
