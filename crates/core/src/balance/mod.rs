//! Balance-consistency protocol for treasury projections.
//!
//! Treasury balances are kept as denormalized rows per
//! (treasury account, currency), maintained by incremental adjustment
//! rather than recomputation. The invariant:
//!
//! ```text
//! balance(account, currency) == Σ signed(t) over live transactions t
//! where signed(t) = +amount for income, -amount for expense
//! ```
//!
//! Every mutation of a transaction maps to a set of [`BalanceChange`]
//! deltas: create applies the new signed amount, delete reverts the old
//! one, and update reverts-then-applies. The deltas for one mutation
//! must be committed atomically with the transaction row itself; the
//! repository layer wraps them in a single database transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use obralis_shared::types::Currency;

/// Direction of a treasury movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money entering the treasury account.
    Income,
    /// Money leaving the treasury account.
    Expense,
}

impl Direction {
    /// Applies the direction's sign to a positive amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

/// Key identifying one denormalized balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The treasury account (cash box or bank account).
    pub treasury_account_id: Uuid,
    /// The currency of the balance row.
    pub currency: Currency,
}

/// A signed delta against one balance row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// The balance row to adjust.
    pub key: BalanceKey,
    /// The signed amount to add to the stored balance.
    pub delta: Decimal,
}

/// The balance-relevant fields of a treasury transaction.
///
/// Captured before and after a mutation to derive the adjustment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceFootprint {
    /// The treasury account the transaction moves money through.
    pub treasury_account_id: Uuid,
    /// The transaction currency.
    pub currency: Currency,
    /// Income or expense.
    pub direction: Direction,
    /// The positive transaction amount.
    pub amount: Decimal,
}

impl BalanceFootprint {
    /// The balance row this footprint adjusts.
    #[must_use]
    pub const fn key(&self) -> BalanceKey {
        BalanceKey {
            treasury_account_id: self.treasury_account_id,
            currency: self.currency,
        }
    }

    /// The signed contribution of this transaction to its balance row.
    #[must_use]
    pub fn signed(&self) -> Decimal {
        self.direction.signed(self.amount)
    }
}

/// Deltas to apply when a transaction is created.
#[must_use]
pub fn changes_for_create(new: &BalanceFootprint) -> Vec<BalanceChange> {
    vec![BalanceChange {
        key: new.key(),
        delta: new.signed(),
    }]
}

/// Deltas to apply when a transaction is deleted.
#[must_use]
pub fn changes_for_delete(old: &BalanceFootprint) -> Vec<BalanceChange> {
    vec![BalanceChange {
        key: old.key(),
        delta: -old.signed(),
    }]
}

/// Deltas to apply when a transaction is updated.
///
/// Reverts the old signed amount and applies the new one. When both
/// footprints hit the same balance row the two deltas collapse into a
/// single adjustment (and into none when the net delta is zero).
#[must_use]
pub fn changes_for_update(old: &BalanceFootprint, new: &BalanceFootprint) -> Vec<BalanceChange> {
    if old.key() == new.key() {
        let delta = new.signed() - old.signed();
        if delta.is_zero() {
            return vec![];
        }
        return vec![BalanceChange {
            key: old.key(),
            delta,
        }];
    }

    vec![
        BalanceChange {
            key: old.key(),
            delta: -old.signed(),
        },
        BalanceChange {
            key: new.key(),
            delta: new.signed(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn footprint(account: Uuid, currency: Currency, direction: Direction, amount: Decimal) -> BalanceFootprint {
        BalanceFootprint {
            treasury_account_id: account,
            currency,
            direction,
            amount,
        }
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(Direction::Income.signed(dec!(100)), dec!(100));
        assert_eq!(Direction::Expense.signed(dec!(100)), dec!(-100));
    }

    #[test]
    fn test_create_applies_signed_amount() {
        let account = Uuid::new_v4();
        let fp = footprint(account, Currency::Ars, Direction::Expense, dec!(250.50));

        let changes = changes_for_create(&fp);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key.treasury_account_id, account);
        assert_eq!(changes[0].delta, dec!(-250.50));
    }

    #[test]
    fn test_delete_reverts_signed_amount() {
        let fp = footprint(Uuid::new_v4(), Currency::Usd, Direction::Income, dec!(80));

        let changes = changes_for_delete(&fp);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].delta, dec!(-80));
    }

    #[test]
    fn test_update_same_row_collapses() {
        let account = Uuid::new_v4();
        let old = footprint(account, Currency::Ars, Direction::Income, dec!(100));
        let new = footprint(account, Currency::Ars, Direction::Income, dec!(130));

        let changes = changes_for_update(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].delta, dec!(30));
    }

    #[test]
    fn test_update_direction_flip() {
        let account = Uuid::new_v4();
        let old = footprint(account, Currency::Ars, Direction::Income, dec!(100));
        let new = footprint(account, Currency::Ars, Direction::Expense, dec!(100));

        let changes = changes_for_update(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].delta, dec!(-200));
    }

    #[test]
    fn test_update_no_change_is_empty() {
        let account = Uuid::new_v4();
        let fp = footprint(account, Currency::Ars, Direction::Income, dec!(100));

        assert!(changes_for_update(&fp, &fp).is_empty());
    }

    #[test]
    fn test_update_across_accounts() {
        let old = footprint(Uuid::new_v4(), Currency::Ars, Direction::Income, dec!(100));
        let new = footprint(Uuid::new_v4(), Currency::Usd, Direction::Income, dec!(100));

        let changes = changes_for_update(&old, &new);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key, old.key());
        assert_eq!(changes[0].delta, dec!(-100));
        assert_eq!(changes[1].key, new.key());
        assert_eq!(changes[1].delta, dec!(100));
    }

    // ======================================================================
    // Property: for any sequence of create/update/delete mutations, the
    // incrementally maintained balances equal the recomputed sums of the
    // live transactions.
    // ======================================================================

    #[derive(Debug, Clone)]
    enum Mutation {
        Create(BalanceFootprint),
        Update(usize, BalanceFootprint),
        Delete(usize),
    }

    fn currency_strategy() -> impl Strategy<Value = Currency> {
        prop_oneof![Just(Currency::Ars), Just(Currency::Usd), Just(Currency::Eur)]
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Income), Just(Direction::Expense)]
    }

    fn footprint_strategy(accounts: Vec<Uuid>) -> impl Strategy<Value = BalanceFootprint> {
        (
            0..accounts.len(),
            currency_strategy(),
            direction_strategy(),
            1i64..1_000_000i64,
        )
            .prop_map(move |(idx, currency, direction, cents)| BalanceFootprint {
                treasury_account_id: accounts[idx],
                currency,
                direction,
                amount: Decimal::new(cents, 2),
            })
    }

    fn mutation_strategy(accounts: Vec<Uuid>) -> impl Strategy<Value = Mutation> {
        prop_oneof![
            3 => footprint_strategy(accounts.clone()).prop_map(Mutation::Create),
            2 => (0usize..64, footprint_strategy(accounts)).prop_map(|(i, fp)| Mutation::Update(i, fp)),
            1 => (0usize..64).prop_map(Mutation::Delete),
        ]
    }

    fn apply(balances: &mut HashMap<BalanceKey, Decimal>, changes: &[BalanceChange]) {
        for change in changes {
            *balances.entry(change.key).or_insert(Decimal::ZERO) += change.delta;
        }
    }

    fn recompute(live: &[BalanceFootprint]) -> HashMap<BalanceKey, Decimal> {
        let mut sums = HashMap::new();
        for fp in live {
            *sums.entry(fp.key()).or_insert(Decimal::ZERO) += fp.signed();
        }
        sums
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For every account and currency, the incrementally maintained
        /// balance equals the sum of signed amounts of live transactions,
        /// after any interleaving of creates, updates, and deletes.
        #[test]
        fn prop_incremental_balance_matches_recompute(
            mutations in {
                let accounts: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
                prop::collection::vec(mutation_strategy(accounts), 1..40)
            },
        ) {
            let mut live: Vec<BalanceFootprint> = Vec::new();
            let mut balances: HashMap<BalanceKey, Decimal> = HashMap::new();

            for mutation in mutations {
                match mutation {
                    Mutation::Create(fp) => {
                        apply(&mut balances, &changes_for_create(&fp));
                        live.push(fp);
                    }
                    Mutation::Update(idx, new_fp) => {
                        if live.is_empty() {
                            continue;
                        }
                        let idx = idx % live.len();
                        let old_fp = live[idx];
                        apply(&mut balances, &changes_for_update(&old_fp, &new_fp));
                        live[idx] = new_fp;
                    }
                    Mutation::Delete(idx) => {
                        if live.is_empty() {
                            continue;
                        }
                        let idx = idx % live.len();
                        let old_fp = live.remove(idx);
                        apply(&mut balances, &changes_for_delete(&old_fp));
                    }
                }

                let expected = recompute(&live);
                for (key, sum) in &expected {
                    prop_assert_eq!(
                        balances.get(key).copied().unwrap_or(Decimal::ZERO),
                        *sum,
                        "balance drifted from sum of live transactions"
                    );
                }
                for (key, balance) in &balances {
                    if !expected.contains_key(key) {
                        prop_assert_eq!(*balance, Decimal::ZERO);
                    }
                }
            }
        }

        /// An update is exactly a delete followed by a create: the merged
        /// delta set has the same net effect on every balance row.
        #[test]
        fn prop_update_equals_revert_then_apply(
            (old, new) in (0u8..2).prop_flat_map(|shared| {
                let accounts: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
                let old_accounts = accounts.clone();
                let new_accounts = if shared == 0 { accounts } else {
                    (0..2).map(|_| Uuid::new_v4()).collect()
                };
                (footprint_strategy(old_accounts), footprint_strategy(new_accounts))
            }),
        ) {
            let mut merged: HashMap<BalanceKey, Decimal> = HashMap::new();
            apply(&mut merged, &changes_for_update(&old, &new));

            let mut sequential: HashMap<BalanceKey, Decimal> = HashMap::new();
            apply(&mut sequential, &changes_for_delete(&old));
            apply(&mut sequential, &changes_for_create(&new));

            for (key, delta) in &sequential {
                prop_assert_eq!(
                    merged.get(key).copied().unwrap_or(Decimal::ZERO),
                    *delta
                );
            }
        }
    }
}
