use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crowdgate_core::{AggregateRoot, HolderId, LedgerId, SaleError, SaleResult, ValueObject};

/// Token display metadata (name, symbol, decimal places).
///
/// Metadata only: the ledger's arithmetic is always in whole base units and
/// never consults `decimals`. Converting user-facing decimal notation happens
/// at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl ValueObject for TokenInfo {}

/// Aggregate root: Ledger (fungible-token balance store).
///
/// Holds a fixed total supply and per-holder balances. The supply is credited
/// in full to the deployer at construction and thereafter only moves between
/// holders through `transfer`; it is never minted or burned. A holder with no
/// map entry has balance zero, and entries drained to zero are removed, so
/// absence and zero are the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    id: LedgerId,
    info: TokenInfo,
    total_supply: u128,
    balances: HashMap<HolderId, u128>,
    version: u64,
}

impl Ledger {
    /// Create a ledger with `total_supply` credited to `deployer`.
    pub fn new(id: LedgerId, info: TokenInfo, total_supply: u128, deployer: HolderId) -> Self {
        let mut balances = HashMap::new();
        if total_supply > 0 {
            balances.insert(deployer, total_supply);
        }
        Self {
            id,
            info,
            total_supply,
            balances,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    /// Fixed total supply, constant after construction.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `holder`; zero for holders the ledger has never seen.
    pub fn balance_of(&self, holder: HolderId) -> u128 {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// All-or-nothing: a rejected transfer leaves both balances untouched.
    /// A self-transfer of an affordable amount is a no-op success.
    pub fn transfer(&mut self, from: HolderId, to: HolderId, amount: u128) -> SaleResult<()> {
        if amount == 0 {
            return Err(SaleError::InvalidAmount);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(SaleError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        if from != to {
            let remaining = available - amount;
            if remaining == 0 {
                self.balances.remove(&from);
            } else {
                self.balances.insert(from, remaining);
            }

            // Credit cannot overflow: the debit above keeps the sum of all
            // balances at total_supply.
            *self.balances.entry(to).or_insert(0) += amount;
        }

        self.version += 1;
        Ok(())
    }

    /// Number of holders with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_info() -> TokenInfo {
        TokenInfo {
            name: "Crowdgate Token".to_string(),
            symbol: "CGT".to_string(),
            decimals: 18,
        }
    }

    fn test_ledger(supply: u128) -> (Ledger, HolderId) {
        let deployer = HolderId::new();
        let ledger = Ledger::new(LedgerId::new(), test_info(), supply, deployer);
        (ledger, deployer)
    }

    #[test]
    fn deployer_holds_full_supply_at_construction() {
        let (ledger, deployer) = test_ledger(1_000_000);
        assert_eq!(ledger.total_supply(), 1_000_000);
        assert_eq!(ledger.balance_of(deployer), 1_000_000);
        assert_eq!(ledger.holder_count(), 1);
    }

    #[test]
    fn transfer_debits_and_credits_by_equal_amount() {
        let (mut ledger, deployer) = test_ledger(1_000);
        let buyer = HolderId::new();

        ledger.transfer(deployer, buyer, 300).unwrap();

        assert_eq!(ledger.balance_of(deployer), 700);
        assert_eq!(ledger.balance_of(buyer), 300);
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn zero_amount_transfer_is_rejected() {
        let (mut ledger, deployer) = test_ledger(1_000);
        let buyer = HolderId::new();

        let err = ledger.transfer(deployer, buyer, 0).unwrap_err();
        assert_eq!(err, SaleError::InvalidAmount);
        assert_eq!(ledger.balance_of(deployer), 1_000);
        assert_eq!(ledger.version(), 0);
    }

    #[test]
    fn overdraft_is_rejected_without_state_change() {
        let (mut ledger, deployer) = test_ledger(100);
        let buyer = HolderId::new();

        let err = ledger.transfer(deployer, buyer, 101).unwrap_err();
        assert_eq!(
            err,
            SaleError::InsufficientBalance {
                available: 100,
                requested: 101,
            }
        );
        assert_eq!(ledger.balance_of(deployer), 100);
        assert_eq!(ledger.balance_of(buyer), 0);
    }

    #[test]
    fn transfer_from_unknown_holder_is_insufficient() {
        let (mut ledger, _deployer) = test_ledger(100);
        let stranger = HolderId::new();
        let buyer = HolderId::new();

        let err = ledger.transfer(stranger, buyer, 1).unwrap_err();
        assert_eq!(
            err,
            SaleError::InsufficientBalance {
                available: 0,
                requested: 1,
            }
        );
    }

    #[test]
    fn drained_holder_entry_is_removed() {
        let (mut ledger, deployer) = test_ledger(100);
        let buyer = HolderId::new();

        ledger.transfer(deployer, buyer, 100).unwrap();

        assert_eq!(ledger.balance_of(deployer), 0);
        assert_eq!(ledger.holder_count(), 1);
    }

    #[test]
    fn self_transfer_is_a_noop_success() {
        let (mut ledger, deployer) = test_ledger(100);

        ledger.transfer(deployer, deployer, 40).unwrap();

        assert_eq!(ledger.balance_of(deployer), 100);
        assert_eq!(ledger.holder_count(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any sequence of transfers, successful or rejected,
        /// conserves the total supply across all holders.
        #[test]
        fn transfers_conserve_total_supply(
            amounts in prop::collection::vec(0u128..2_000, 1..40)
        ) {
            let supply: u128 = 10_000;
            let deployer = HolderId::new();
            let mut ledger = Ledger::new(LedgerId::new(), test_info(), supply, deployer);

            let holders: Vec<HolderId> =
                std::iter::once(deployer).chain((0..3).map(|_| HolderId::new())).collect();

            for (i, amount) in amounts.iter().enumerate() {
                let from = holders[i % holders.len()];
                let to = holders[(i + 1) % holders.len()];
                // Rejections are fine; they must not move anything.
                let _ = ledger.transfer(from, to, *amount);

                let total: u128 = holders.iter().map(|h| ledger.balance_of(*h)).sum();
                prop_assert_eq!(total, supply);
            }
        }
    }
}
