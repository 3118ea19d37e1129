//! Sale time window value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SaleError, SaleResult};
use crate::value_object::ValueObject;

/// Closed interval `[opens_at, closes_at]` bounding public purchases.
///
/// The engine never reads the ambient clock; callers pass `now` explicitly
/// and the window answers whether that instant is inside the interval. Both
/// bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    opens_at: DateTime<Utc>,
    closes_at: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting an inverted interval.
    pub fn new(opens_at: DateTime<Utc>, closes_at: DateTime<Utc>) -> SaleResult<Self> {
        if opens_at > closes_at {
            return Err(SaleError::InvalidAmount);
        }
        Ok(Self { opens_at, closes_at })
    }

    pub fn opens_at(&self) -> DateTime<Utc> {
        self.opens_at
    }

    pub fn closes_at(&self) -> DateTime<Utc> {
        self.closes_at
    }

    /// True if `now` falls inside the window (bounds inclusive).
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.opens_at <= now && now <= self.closes_at
    }

    /// True if `now` is before the window opens.
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        now < self.opens_at
    }

    /// True if `now` is past the window close.
    pub fn has_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.closes_at
    }
}

impl ValueObject for TimeWindow {}
