//! Pairwise balance aggregation.
//!
//! Folds expense and settlement records into a mapping from canonical user
//! pair to signed amount. Balances are always recomputed from the records of
//! the requested scope; nothing here is cached or incrementally maintained.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    EngineError, Expense, MoneyCents, ResultEngine, Scope, Settlement,
};

/// Canonical unordered user pair: the smaller id always comes first.
///
/// Each pair of users has exactly one representation, so a pairwise balance
/// needs a single signed entry instead of two mirrored ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Builds the canonical pair for two distinct users.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> ResultEngine<Self> {
        let a = a.into();
        let b = b.into();
        if a == b {
            return Err(EngineError::SelfSettlement(a));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    /// Returns `true` if `user_id` is one of the two users.
    pub fn involves(&self, user_id: &str) -> bool {
        self.first == user_id || self.second == user_id
    }

    /// Returns the other user of the pair, if `user_id` is part of it.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.first == user_id {
            Some(&self.second)
        } else if self.second == user_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Pairwise balances for a scope.
///
/// The signed amount of an entry means "first id owes second id"; negative
/// means the reverse. Zero-net pairs are dropped when aggregation finishes:
/// an absent pair is a settled pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairBalances {
    entries: BTreeMap<PairKey, MoneyCents>,
}

impl PairBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` of debt from `debtor` to `creditor`, flipping the sign
    /// when the canonical order reverses the direction. A negative `amount`
    /// reduces the debt (a settlement).
    pub fn add_debt(
        &mut self,
        debtor: &str,
        creditor: &str,
        amount: MoneyCents,
    ) -> ResultEngine<()> {
        let pair = PairKey::new(debtor, creditor)?;
        let signed = if pair.first() == debtor { amount } else { -amount };
        *self.entries.entry(pair).or_insert(MoneyCents::ZERO) += signed;
        Ok(())
    }

    /// Signed amount `user_a` owes `user_b` (negative: `user_b` owes
    /// `user_a`, zero: settled or no history).
    pub fn owed(&self, user_a: &str, user_b: &str) -> ResultEngine<MoneyCents> {
        let pair = PairKey::new(user_a, user_b)?;
        let amount = self.entries.get(&pair).copied().unwrap_or(MoneyCents::ZERO);
        Ok(if pair.first() == user_a { amount } else { -amount })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, MoneyCents)> {
        self.entries.iter().map(|(pair, amount)| (pair, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All user ids appearing in at least one pair.
    pub fn users(&self) -> BTreeSet<String> {
        let mut users = BTreeSet::new();
        for pair in self.entries.keys() {
            users.insert(pair.first().to_string());
            users.insert(pair.second().to_string());
        }
        users
    }

    /// Drops pairs whose net amount folded to zero.
    fn prune_settled(&mut self) {
        self.entries.retain(|_, amount| !amount.is_zero());
    }
}

/// The balance between exactly two users, as returned by pair queries:
/// the canonical pair plus the signed amount ("first owes second").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairBalance {
    pub pair: PairKey,
    pub amount: MoneyCents,
}

impl PairBalance {
    /// Signed amount `user_id` owes the counterpart (negative: the
    /// counterpart owes them). Zero for a user outside the pair.
    pub fn owed_by(&self, user_id: &str) -> MoneyCents {
        if self.pair.first() == user_id {
            self.amount
        } else if self.pair.second() == user_id {
            -self.amount
        } else {
            MoneyCents::ZERO
        }
    }
}

fn expense_in_scope(expense: &Expense, scope: &Scope) -> bool {
    match scope {
        Scope::Group(group_id) => expense.group_id == Some(*group_id),
        Scope::Personal(user_id) => {
            expense.group_id.is_none()
                && (expense.paid_by == *user_id
                    || expense.splits.iter().any(|s| s.user_id == *user_id))
        }
    }
}

fn settlement_in_scope(settlement: &Settlement, scope: &Scope) -> bool {
    match scope {
        Scope::Group(group_id) => settlement.group_id == Some(*group_id),
        Scope::Personal(user_id) => {
            settlement.group_id.is_none()
                && (settlement.paid_by == *user_id || settlement.received_by == *user_id)
        }
    }
}

/// Folds the scoped records into a pairwise balance mapping.
///
/// - an unsettled split adds debt split-user -> payer; self-shares and zero
///   splits contribute nothing
/// - a settlement subtracts in the payer-owes-receiver direction; paying more
///   than is owed flips the sign of the remaining balance
/// - for a personal scope only pairs involving the scope user are folded
pub fn aggregate(
    scope: &Scope,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> ResultEngine<PairBalances> {
    let mut balances = PairBalances::new();

    for expense in expenses.iter().filter(|e| expense_in_scope(e, scope)) {
        for split in &expense.splits {
            if split.user_id == expense.paid_by || split.settled || split.amount.is_zero() {
                continue;
            }
            if let Scope::Personal(user_id) = scope
                && split.user_id != *user_id
                && expense.paid_by != *user_id
            {
                continue;
            }
            balances.add_debt(&split.user_id, &expense.paid_by, split.amount)?;
        }
    }

    for settlement in settlements.iter().filter(|s| settlement_in_scope(s, scope)) {
        balances.add_debt(&settlement.paid_by, &settlement.received_by, -settlement.amount)?;
    }

    balances.prune_settled();
    Ok(balances)
}
