use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crowdgate_core::{
    AggregateRoot, EngineId, HolderId, LedgerId, SaleError, SaleResult, TimeWindow,
};
use crowdgate_events::EventEnvelope;
use crowdgate_ledger::Ledger;

use crate::event::{Buy, Finalize, PriceUpdated, SaleEvent};

const AGGREGATE_TYPE: &str = "sale.engine";

/// Sale lifecycle state, derived from the window and the finalize flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleState {
    Pending,
    Open,
    Closed,
}

/// Construction parameters fixed at engine creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Payment units per whole token; must be positive.
    pub price: u128,
    /// Total sellable allocation declared at deployment.
    pub max_tokens: u128,
    /// Optional public-purchase window. `None` means always open until
    /// finalized.
    pub window: Option<TimeWindow>,
}

/// What finalize hands back to the administrator: the unsold tokens returned
/// to their ledger balance and the payment custody swept out of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub tokens_returned: u128,
    pub payment_swept: u128,
}

/// Aggregate root: SaleEngine.
///
/// Owns the ledger it sells from, so every mutation of the pair goes through
/// `&mut self` and the borrow checker serializes them; callers in threaded
/// settings wrap the engine in a single mutex. Every mutating operation takes
/// the caller's identity explicitly and checks all of its preconditions
/// before the first state write, so a rejection never leaves a partial
/// update behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleEngine {
    id: EngineId,
    /// The holder whose ledger balance is the engine's sellable allocation.
    custody: HolderId,
    ledger: Ledger,
    administrator: HolderId,
    price: u128,
    max_tokens: u128,
    tokens_sold: u128,
    payment_balance: u128,
    window: Option<TimeWindow>,
    whitelist: HashSet<HolderId>,
    finalized: bool,
    version: u64,
    log: Vec<EventEnvelope<SaleEvent>>,
}

impl SaleEngine {
    /// Create an engine selling from `ledger` on behalf of `administrator`.
    ///
    /// The engine starts with an empty custody balance; the deployer moves
    /// the sellable allocation in with [`SaleEngine::fund`] before the first
    /// purchase can succeed.
    pub fn new(ledger: Ledger, administrator: HolderId, config: SaleConfig) -> SaleResult<Self> {
        if config.price == 0 {
            return Err(SaleError::InvalidAmount);
        }

        Ok(Self {
            id: EngineId::new(),
            custody: HolderId::new(),
            ledger,
            administrator,
            price: config.price,
            max_tokens: config.max_tokens,
            tokens_sold: 0,
            payment_balance: 0,
            window: config.window,
            whitelist: HashSet::new(),
            finalized: false,
            version: 0,
            log: Vec::new(),
        })
    }

    // ── read accessors ──────────────────────────────────────────────────

    pub fn custody(&self) -> HolderId {
        self.custody
    }

    pub fn administrator(&self) -> HolderId {
        self.administrator
    }

    /// Identity of the ledger/asset being sold.
    pub fn token(&self) -> LedgerId {
        self.ledger.id_typed()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn price(&self) -> u128 {
        self.price
    }

    pub fn max_tokens(&self) -> u128 {
        self.max_tokens
    }

    /// Running total of tokens sold through the engine (not counting any
    /// tokens the administrator moves outside the sale).
    pub fn tokens_sold(&self) -> u128 {
        self.tokens_sold
    }

    /// Payment custody collected from purchases, until swept by finalize.
    pub fn payment_balance(&self) -> u128 {
        self.payment_balance
    }

    pub fn balance_of(&self, holder: HolderId) -> u128 {
        self.ledger.balance_of(holder)
    }

    pub fn is_whitelisted(&self, holder: HolderId) -> bool {
        self.whitelist.contains(&holder)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn window(&self) -> Option<&TimeWindow> {
        self.window.as_ref()
    }

    /// Lifecycle state at instant `now`.
    ///
    /// `Closed` is absorbing: once finalized (or past the window) no
    /// transition leaves it.
    pub fn state(&self, now: DateTime<Utc>) -> SaleState {
        if self.finalized {
            return SaleState::Closed;
        }
        match &self.window {
            Some(w) if w.is_pending(now) => SaleState::Pending,
            Some(w) if w.has_closed(now) => SaleState::Closed,
            _ => SaleState::Open,
        }
    }

    /// The full ordered event log, oldest first.
    pub fn events(&self) -> &[EventEnvelope<SaleEvent>] {
        &self.log
    }

    // ── deployment ──────────────────────────────────────────────────────

    /// Move `amount` tokens from `from` into the engine's custody.
    ///
    /// This is the deployment step that arms the sale; purchases fail with
    /// `InsufficientBalance` until the allocation is in.
    pub fn fund(&mut self, from: HolderId, amount: u128) -> SaleResult<()> {
        let custody = self.custody;
        self.ledger.transfer(from, custody, amount)?;
        self.version += 1;
        Ok(())
    }

    // ── purchase paths ──────────────────────────────────────────────────

    /// Public purchase: `amount` tokens against an exactly matching payment.
    pub fn buy_tokens(
        &mut self,
        buyer: HolderId,
        amount: u128,
        payment: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        self.ensure_open(now)?;
        self.execute_purchase(buyer, amount, payment, now)
    }

    /// Whitelist purchase: same contract as [`SaleEngine::buy_tokens`], but
    /// the buyer must be on the whitelist.
    ///
    /// This path deliberately bypasses the time window (it is the presale
    /// lane for invited buyers); it remains gated by finalization.
    pub fn buy_whitelist_tokens(
        &mut self,
        buyer: HolderId,
        amount: u128,
        payment: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        if self.finalized {
            return Err(SaleError::SaleNotOpen);
        }
        if !self.whitelist.contains(&buyer) {
            return Err(SaleError::NotWhitelisted);
        }
        self.execute_purchase(buyer, amount, payment, now)
    }

    /// Direct-payment purchase: buy as many whole tokens as `payment` covers.
    ///
    /// The token amount is `payment / price` with truncating division; an
    /// indivisible remainder is forfeited to the engine's payment custody
    /// rather than refunded. A payment below the price of one token buys
    /// nothing and is rejected outright.
    pub fn receive_payment(
        &mut self,
        buyer: HolderId,
        payment: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        self.ensure_open(now)?;

        let amount = payment / self.price;
        if amount == 0 {
            return Err(SaleError::InvalidAmount);
        }

        self.commit_purchase(buyer, amount, payment, now)
    }

    // ── administration ──────────────────────────────────────────────────

    /// Replace the sale price. Admin-only; the new price must be positive.
    pub fn set_price(
        &mut self,
        caller: HolderId,
        new_price: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        self.ensure_admin(caller)?;
        if self.finalized {
            return Err(SaleError::AlreadyFinalized);
        }
        if new_price == 0 {
            return Err(SaleError::InvalidAmount);
        }

        let old_price = self.price;
        self.price = new_price;
        self.version += 1;

        Ok(self.append(SaleEvent::PriceUpdated(PriceUpdated {
            old_price,
            new_price,
            occurred_at: now,
        })))
    }

    /// Add `holder` to the whitelist. Admin-only; re-adding is a no-op
    /// success.
    pub fn add_to_whitelist(&mut self, caller: HolderId, holder: HolderId) -> SaleResult<()> {
        self.ensure_admin(caller)?;
        if self.finalized {
            return Err(SaleError::AlreadyFinalized);
        }
        if self.whitelist.insert(holder) {
            self.version += 1;
        }
        Ok(())
    }

    /// Remove `holder` from the whitelist. Admin-only; removing an absent
    /// holder is a no-op success.
    pub fn remove_from_whitelist(&mut self, caller: HolderId, holder: HolderId) -> SaleResult<()> {
        self.ensure_admin(caller)?;
        if self.finalized {
            return Err(SaleError::AlreadyFinalized);
        }
        if self.whitelist.remove(&holder) {
            self.version += 1;
        }
        Ok(())
    }

    /// Finalize the sale: sweep unsold tokens and collected payment to the
    /// administrator and close the sale permanently.
    ///
    /// One-shot: a second call fails with `AlreadyFinalized` and moves
    /// nothing.
    pub fn finalize(&mut self, caller: HolderId, now: DateTime<Utc>) -> SaleResult<Settlement> {
        self.ensure_admin(caller)?;
        if self.finalized {
            return Err(SaleError::AlreadyFinalized);
        }

        let remaining = self.ledger.balance_of(self.custody);
        if remaining > 0 {
            let (custody, administrator) = (self.custody, self.administrator);
            self.ledger.transfer(custody, administrator, remaining)?;
        }

        let payment_swept = self.payment_balance;
        self.payment_balance = 0;
        self.finalized = true;
        self.version += 1;

        self.append(SaleEvent::Finalize(Finalize {
            tokens_sold: self.tokens_sold,
            payment_collected: payment_swept,
            occurred_at: now,
        }));

        Ok(Settlement {
            tokens_returned: remaining,
            payment_swept,
        })
    }

    // ── internals ───────────────────────────────────────────────────────

    fn ensure_admin(&self, caller: HolderId) -> SaleResult<()> {
        if caller != self.administrator {
            return Err(SaleError::Unauthorized);
        }
        Ok(())
    }

    fn ensure_open(&self, now: DateTime<Utc>) -> SaleResult<()> {
        if self.state(now) != SaleState::Open {
            return Err(SaleError::SaleNotOpen);
        }
        Ok(())
    }

    /// Exact-payment purchase shared by the public and whitelist paths.
    fn execute_purchase(
        &mut self,
        buyer: HolderId,
        amount: u128,
        payment: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        if amount == 0 {
            return Err(SaleError::InvalidAmount);
        }

        // An unrepresentable required payment means the request itself is
        // out of range.
        let required = self
            .price
            .checked_mul(amount)
            .ok_or(SaleError::InvalidAmount)?;
        if payment != required {
            return Err(SaleError::IncorrectPayment {
                required,
                attached: payment,
            });
        }

        self.commit_purchase(buyer, amount, payment, now)
    }

    /// Commit a validated purchase: custody transfer, counters, event.
    ///
    /// Every remaining failure is checked before the first write, keeping
    /// rejected purchases free of partial state.
    fn commit_purchase(
        &mut self,
        buyer: HolderId,
        amount: u128,
        payment: u128,
        now: DateTime<Utc>,
    ) -> SaleResult<SaleEvent> {
        let tokens_sold = self
            .tokens_sold
            .checked_add(amount)
            .ok_or(SaleError::InvalidAmount)?;
        let payment_balance = self
            .payment_balance
            .checked_add(payment)
            .ok_or(SaleError::InvalidAmount)?;

        // The ledger transfer is all-or-nothing and is the last fallible
        // step; counters are written only after it succeeds.
        let custody = self.custody;
        self.ledger.transfer(custody, buyer, amount)?;

        self.tokens_sold = tokens_sold;
        self.payment_balance = payment_balance;
        self.version += 1;

        Ok(self.append(SaleEvent::Buy(Buy {
            amount,
            buyer,
            occurred_at: now,
        })))
    }

    fn append(&mut self, event: SaleEvent) -> SaleEvent {
        let sequence_number = self.log.len() as u64 + 1;
        self.log.push(EventEnvelope::new(
            Uuid::now_v7(),
            *self.id.as_uuid(),
            AGGREGATE_TYPE,
            sequence_number,
            event,
        ));
        event
    }
}

impl AggregateRoot for SaleEngine {
    type Id = EngineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
