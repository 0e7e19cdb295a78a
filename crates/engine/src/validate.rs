//! Settlement validation.
//!
//! The validator sits beside the aggregator: it checks a proposed settlement
//! against business rules before the caller hands it to the write path. It
//! never persists anything itself; acceptance only means "safe to record".

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{EngineError, MoneyCents, PairBalances, ResultEngine};

/// A settlement as proposed by a caller, before it is recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementProposal {
    pub group_id: Option<Uuid>,
    pub paid_by: String,
    pub received_by: String,
    pub amount: MoneyCents,
}

/// Validates a proposed settlement against the participants of its scope and
/// the current pairwise balances.
///
/// Rules:
/// - amount must be > 0
/// - payer and receiver must differ
/// - both must be valid participants in the scope
///
/// Overpayment is allowed: real payments are not required to match computed
/// balances, so a settlement larger than the owed amount simply flips the
/// direction of what remains. On acceptance the projected remaining balance
/// is returned, oriented "payer still owes receiver" (negative: the receiver
/// would owe the payer).
pub fn validate_settlement(
    proposal: &SettlementProposal,
    participants: &BTreeSet<String>,
    balances: &PairBalances,
) -> ResultEngine<MoneyCents> {
    if !proposal.amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "settlement amount must be > 0".to_string(),
        ));
    }
    if proposal.paid_by == proposal.received_by {
        return Err(EngineError::SelfSettlement(proposal.paid_by.clone()));
    }
    for user_id in [&proposal.paid_by, &proposal.received_by] {
        if !participants.contains(user_id) {
            return Err(EngineError::UnknownParticipant(user_id.clone()));
        }
    }

    let owed = balances.owed(&proposal.paid_by, &proposal.received_by)?;
    Ok(owed - proposal.amount)
}
