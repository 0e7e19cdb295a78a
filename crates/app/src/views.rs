//! Mappings from engine results to the shared response bodies.

use api_types::balance::{CounterpartView, GroupBalancesResponse, PairBalanceView, UserBalanceView};
use api_types::settlement::{SettlementAccepted, SuggestionsResponse, TransferView};
use engine::{MoneyCents, PairBalance, Transfer, UserBalance};
use uuid::Uuid;

pub fn pair_balance(balance: &PairBalance) -> PairBalanceView {
    PairBalanceView {
        first: balance.pair.first().to_string(),
        second: balance.pair.second().to_string(),
        amount_minor: balance.amount.cents(),
    }
}

pub fn group_balances(group_id: Uuid, balances: &[UserBalance]) -> GroupBalancesResponse {
    GroupBalancesResponse {
        group_id,
        balances: balances
            .iter()
            .map(|balance| UserBalanceView {
                user_id: balance.user_id.clone(),
                net_minor: balance.net.cents(),
                counterparts: balance
                    .counterparts
                    .iter()
                    .map(|(user_id, amount)| CounterpartView {
                        user_id: user_id.clone(),
                        amount_minor: amount.cents(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn suggestions(transfers: &[Transfer]) -> SuggestionsResponse {
    SuggestionsResponse {
        transfers: transfers
            .iter()
            .map(|transfer| TransferView {
                from: transfer.from.clone(),
                to: transfer.to.clone(),
                amount_minor: transfer.amount.cents(),
            })
            .collect(),
    }
}

pub fn settlement_accepted(remaining: MoneyCents) -> SettlementAccepted {
    SettlementAccepted {
        remaining_minor: remaining.cents(),
    }
}
