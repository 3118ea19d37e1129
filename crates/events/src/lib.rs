//! `crowdgate-events` — append-only event machinery.
//!
//! Mutating operations on the domain aggregates append tagged event records
//! to an ordered log; this crate provides the record contract (`Event`), the
//! envelope that positions a record in its stream (`EventEnvelope`), and the
//! pub/sub plumbing presentation layers use to observe the log (`EventBus`).

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
