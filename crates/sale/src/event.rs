use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crowdgate_core::HolderId;
use crowdgate_events::Event;

/// Event: a purchase was executed (any purchase path).
///
/// Field order (`amount`, then `buyer`) is a compatibility contract for
/// consumers that parse records positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buy {
    pub amount: u128,
    pub buyer: HolderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: the administrator replaced the sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub old_price: u128,
    pub new_price: u128,
    pub occurred_at: DateTime<Utc>,
}

/// Event: the sale was finalized.
///
/// Field order (`tokens_sold`, then `payment_collected`) is a compatibility
/// contract, like [`Buy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalize {
    pub tokens_sold: u128,
    pub payment_collected: u128,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEvent {
    Buy(Buy),
    PriceUpdated(PriceUpdated),
    Finalize(Finalize),
}

impl Event for SaleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::Buy(_) => "sale.buy",
            SaleEvent::PriceUpdated(_) => "sale.price_updated",
            SaleEvent::Finalize(_) => "sale.finalize",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SaleEvent::Buy(e) => e.occurred_at,
            SaleEvent::PriceUpdated(e) => e.occurred_at,
            SaleEvent::Finalize(e) => e.occurred_at,
        }
    }
}
