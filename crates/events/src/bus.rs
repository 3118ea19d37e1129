//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the **distribution** side of the event log: mutating calls
//! append records to the aggregate's own log first, and a presentation layer
//! republishes them here for anything that wants to observe the sale live
//! (tickers, countdowns, dashboards).
//!
//! Design constraints:
//! - **Transport-agnostic**: in-memory channels here; anything else behind
//!   the same trait.
//! - **Broadcast semantics**: each subscriber gets a copy of every message.
//! - **No persistence**: the aggregate's log is the source of truth; a
//!   missed message can always be re-read from `events()`.
//! - **At-least-once acceptable**: consumers must tolerate duplicates, which
//!   is cheap because every envelope carries its sequence number.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription owns the receiving half of a channel; messages arrive in
/// publish order. Subscriptions are single-consumer by construction.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. internal lock poisoning); since records are
/// already in the aggregate's log, republishing after a failure is safe.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
