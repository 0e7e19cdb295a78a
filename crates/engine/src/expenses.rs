//! Expense records and their per-participant splits.
//!
//! An [`Expense`] is validated at construction: loosely shaped input (form
//! data, storage rows) must pass through [`Expense::new`] before it can enter
//! the ledger, so the aggregation code can assume clean records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// One participant's share of an expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub user_id: String,
    pub amount: MoneyCents,
    /// Shares already paid back outside the ledger are flagged settled and
    /// excluded from aggregation.
    pub settled: bool,
}

impl Split {
    pub fn new(user_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            settled: false,
        }
    }

    pub fn settled(user_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            settled: true,
        }
    }
}

/// A shared expense paid by one user and split among participants.
///
/// `group_id = None` marks a personal (two-party) expense. A split whose user
/// equals the payer is legal (the payer's own share) and contributes nothing
/// to any balance.
#[derive(Clone, Debug)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Option<Uuid>,
    pub paid_by: String,
    pub amount: MoneyCents,
    pub splits: Vec<Split>,
    pub occurred_at: DateTime<Utc>,
    pub category: Option<String>,
    pub created_by: String,
}

impl Expense {
    /// Creates a validated expense.
    ///
    /// Rules:
    /// - total and every split amount must be >= 0
    /// - split amounts must sum to the total within [`split_tolerance`],
    ///   one minor unit per split, to absorb rounding of uneven splits
    ///   entered as a fractional total
    ///
    /// [`split_tolerance`]: Expense::split_tolerance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        group_id: Option<Uuid>,
        paid_by: impl Into<String>,
        amount: MoneyCents,
        splits: Vec<Split>,
        occurred_at: DateTime<Utc>,
        category: Option<String>,
        created_by: impl Into<String>,
    ) -> ResultEngine<Self> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "expense amount must be >= 0".to_string(),
            ));
        }
        if let Some(split) = splits.iter().find(|s| s.amount.is_negative()) {
            return Err(EngineError::InvalidAmount(format!(
                "split amount for '{}' must be >= 0",
                split.user_id
            )));
        }

        let split_sum: MoneyCents = splits.iter().map(|s| s.amount).sum();
        let tolerance = Self::split_tolerance(splits.len());
        if !(split_sum - amount).approx_zero(tolerance) {
            return Err(EngineError::SplitMismatch(format!(
                "splits sum to {split_sum}, expense total is {amount}"
            )));
        }

        Ok(Self {
            id,
            group_id,
            paid_by: paid_by.into(),
            amount,
            splits,
            occurred_at,
            category,
            created_by: created_by.into(),
        })
    }

    /// Allowed split-sum deviation in minor units: one per split.
    pub fn split_tolerance(split_count: usize) -> i64 {
        split_count as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: i64, splits: Vec<Split>) -> ResultEngine<Expense> {
        Expense::new(
            Uuid::new_v4(),
            None,
            "alice",
            MoneyCents::new(amount),
            splits,
            Utc::now(),
            Some("food".to_string()),
            "alice",
        )
    }

    #[test]
    fn accepts_exact_split_sum() {
        let splits = vec![
            Split::new("alice", MoneyCents::new(3000)),
            Split::new("bob", MoneyCents::new(3000)),
            Split::new("carol", MoneyCents::new(3000)),
        ];
        assert!(expense(9000, splits).is_ok());
    }

    #[test]
    fn accepts_rounding_within_one_unit_per_split() {
        // 100.00 split three ways entered as 33.33 each: off by one cent.
        let splits = vec![
            Split::new("alice", MoneyCents::new(3333)),
            Split::new("bob", MoneyCents::new(3333)),
            Split::new("carol", MoneyCents::new(3333)),
        ];
        assert!(expense(10000, splits).is_ok());
    }

    #[test]
    fn rejects_split_mismatch_beyond_tolerance() {
        let splits = vec![
            Split::new("alice", MoneyCents::new(3000)),
            Split::new("bob", MoneyCents::new(3000)),
        ];
        let err = expense(9000, splits).unwrap_err();
        assert!(matches!(err, EngineError::SplitMismatch(_)));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            expense(-100, vec![]).unwrap_err(),
            EngineError::InvalidAmount(_)
        ));
        let splits = vec![Split::new("bob", MoneyCents::new(-100))];
        assert!(matches!(
            expense(0, splits).unwrap_err(),
            EngineError::InvalidAmount(_)
        ));
    }
}
