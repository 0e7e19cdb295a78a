//! Net position computation (the balance normalizer).

use std::collections::BTreeMap;

use crate::{EngineError, MoneyCents, PairBalances, ResultEngine};

/// A user's balance inside a scope: overall net position plus the
/// per-counterpart breakdown it was derived from.
///
/// Both amounts are oriented "positive = owed to this user".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserBalance {
    pub user_id: String,
    pub net: MoneyCents,
    pub counterparts: Vec<(String, MoneyCents)>,
}

/// Reduces a pairwise balance mapping to one signed net position per user.
///
/// Positive = owed to them, negative = they owe. Every pair contributes `+x`
/// to one user and `-x` to the other, so the positions must sum to exactly
/// zero; if they do not, the upstream records were inconsistent and the whole
/// computation is rejected with [`EngineError::ConservationViolation`].
pub fn net_positions(balances: &PairBalances) -> ResultEngine<BTreeMap<String, MoneyCents>> {
    let mut positions: BTreeMap<String, MoneyCents> = BTreeMap::new();

    for (pair, amount) in balances.iter() {
        // `amount` means "first owes second".
        *positions
            .entry(pair.first().to_string())
            .or_insert(MoneyCents::ZERO) -= amount;
        *positions
            .entry(pair.second().to_string())
            .or_insert(MoneyCents::ZERO) += amount;
    }

    check_conservation(&positions)?;
    Ok(positions)
}

/// Verifies the conservation invariant: net positions sum to zero.
pub(crate) fn check_conservation(
    positions: &BTreeMap<String, MoneyCents>,
) -> ResultEngine<()> {
    let total: MoneyCents = positions.values().copied().sum();
    if !total.is_zero() {
        tracing::error!(total = total.cents(), "net positions do not sum to zero");
        return Err(EngineError::ConservationViolation(format!(
            "net positions sum to {total}, expected zero"
        )));
    }
    Ok(())
}

/// Builds the per-user balance views for a set of users, from the pairwise
/// mapping and the already computed net positions.
///
/// Users without any pair get a zero net and an empty breakdown.
pub(crate) fn user_balances<'a>(
    users: impl Iterator<Item = &'a str>,
    balances: &PairBalances,
    positions: &BTreeMap<String, MoneyCents>,
) -> Vec<UserBalance> {
    users
        .map(|user_id| {
            let mut counterparts: Vec<(String, MoneyCents)> = Vec::new();
            for (pair, amount) in balances.iter() {
                if let Some(other) = pair.counterpart(user_id) {
                    // Orient as "positive = counterpart owes this user".
                    let owed_to_user = if pair.first() == user_id { -amount } else { amount };
                    counterparts.push((other.to_string(), owed_to_user));
                }
            }
            UserBalance {
                user_id: user_id.to_string(),
                net: positions.get(user_id).copied().unwrap_or(MoneyCents::ZERO),
                counterparts,
            }
        })
        .collect()
}
