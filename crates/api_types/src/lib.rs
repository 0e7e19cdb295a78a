//! Serde DTOs shared by every transport in front of the engine.
//!
//! Amounts cross the wire as integer minor units (`*_minor` fields); the
//! engine's fixed-point type never leaves the engine crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod record {
    use super::*;

    /// A full ledger snapshot as stored/exchanged: the engine's input.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerFile {
        #[serde(default)]
        pub groups: Vec<GroupRecord>,
        #[serde(default)]
        pub expenses: Vec<ExpenseRecord>,
        #[serde(default)]
        pub settlements: Vec<SettlementRecord>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupRecord {
        pub id: Uuid,
        pub name: String,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
        pub members: Vec<MemberRecord>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberRecord {
        pub user_id: String,
        pub role: MemberRole,
        pub joined_at: DateTime<Utc>,
    }

    /// Role of a user in a group.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MemberRole {
        Admin,
        Member,
    }

    impl MemberRole {
        /// Returns the canonical role string used by the engine.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "admin",
                Self::Member => "member",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        pub id: Uuid,
        pub group_id: Option<Uuid>,
        pub paid_by: String,
        pub amount_minor: i64,
        pub splits: Vec<SplitRecord>,
        pub occurred_at: DateTime<Utc>,
        pub category: Option<String>,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitRecord {
        pub user_id: String,
        pub amount_minor: i64,
        #[serde(default)]
        pub settled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementRecord {
        pub id: Uuid,
        pub group_id: Option<Uuid>,
        pub paid_by: String,
        pub received_by: String,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub note: Option<String>,
    }
}

pub mod balance {
    use super::*;

    /// Response body for a two-user balance query.
    ///
    /// `amount_minor` is signed and means "`first` owes `second`"; the pair
    /// is canonical (smaller user id first).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PairBalanceView {
        pub first: String,
        pub second: String,
        pub amount_minor: i64,
    }

    /// Response body for a group balance query.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupBalancesResponse {
        pub group_id: Uuid,
        pub balances: Vec<UserBalanceView>,
    }

    /// One member's net position with its per-counterpart breakdown,
    /// oriented "positive = owed to this user".
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserBalanceView {
        pub user_id: String,
        pub net_minor: i64,
        pub counterparts: Vec<CounterpartView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartView {
        pub user_id: String,
        pub amount_minor: i64,
    }
}

pub mod settlement {
    use super::*;

    /// Request body for proposing a settlement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementProposal {
        pub group_id: Option<Uuid>,
        pub paid_by: String,
        pub received_by: String,
        pub amount_minor: i64,
    }

    /// Response body for an accepted settlement proposal.
    ///
    /// `remaining_minor` is the projected balance after the payment,
    /// oriented "payer still owes receiver" (negative: flipped).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementAccepted {
        pub remaining_minor: i64,
    }

    /// A suggested settling transfer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        pub from: String,
        pub to: String,
        pub amount_minor: i64,
    }

    /// Response body for a settlement suggestion query.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SuggestionsResponse {
        pub transfers: Vec<TransferView>,
    }
}
