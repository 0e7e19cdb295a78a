//! Settlement records: payments made to reduce an outstanding balance.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// A recorded payment from `paid_by` to `received_by`.
///
/// A settlement is not required to match the computed balance: paying more
/// than is owed is legal and flips the direction of the remaining pair
/// balance.
#[derive(Clone, Debug)]
pub struct Settlement {
    pub id: Uuid,
    pub group_id: Option<Uuid>,
    pub paid_by: String,
    pub received_by: String,
    pub amount: MoneyCents,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl Settlement {
    /// Creates a validated settlement.
    ///
    /// Rules: amount must be > 0, payer and receiver must differ.
    pub fn new(
        id: Uuid,
        group_id: Option<Uuid>,
        paid_by: impl Into<String>,
        received_by: impl Into<String>,
        amount: MoneyCents,
        occurred_at: DateTime<Utc>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        let paid_by = paid_by.into();
        let received_by = received_by.into();

        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "settlement amount must be > 0".to_string(),
            ));
        }
        if paid_by == received_by {
            return Err(EngineError::SelfSettlement(paid_by));
        }

        Ok(Self {
            id,
            group_id,
            paid_by,
            received_by,
            amount,
            occurred_at,
            note,
        })
    }
}
