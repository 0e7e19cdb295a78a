//! Balance ledger and debt-simplification engine for shared expenses.
//!
//! The engine is a pure, synchronous computation: it takes a consistent
//! snapshot of expense, settlement, and group records and answers balance
//! queries from it. Nothing is cached between calls and nothing is mutated;
//! derived balances are recomputed from the source records on every query.
//!
//! Data flow: records -> [`aggregate`] (pairwise balances) ->
//! [`net_positions`] (one net per user) -> [`simplify`] (suggested
//! transfers). [`validate_settlement`] sits beside the aggregator and checks
//! proposed settlements against the current balances.
//!
//! [`Ledger`] bundles a snapshot with the query surface so callers do not
//! wire the stages themselves.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

pub use balances::{UserBalance, net_positions};
pub use error::EngineError;
pub use expenses::{Expense, Split};
pub use groups::{Group, Member, MemberRole, Scope};
pub use ledger::{PairBalance, PairBalances, PairKey, aggregate};
pub use money::MoneyCents;
pub use settlements::Settlement;
pub use simplify::{Transfer, simplify};
pub use validate::{SettlementProposal, validate_settlement};

mod balances;
mod error;
mod expenses;
mod groups;
mod ledger;
mod money;
mod settlements;
mod simplify;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;

/// An immutable snapshot of the records the engine computes from.
///
/// The caller is responsible for reading expenses, settlements, and groups as
/// a single consistent snapshot (one transactional read) before building a
/// `Ledger`; a write landing between independent reads can produce balances
/// that violate conservation.
#[derive(Debug, Default)]
pub struct Ledger {
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
    groups: HashMap<Uuid, Group>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Return a group by id.
    pub fn group(&self, group_id: Uuid) -> ResultEngine<&Group> {
        self.groups
            .get(&group_id)
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    /// The personal (non-group) balance between two users.
    ///
    /// Returns the canonical pair and the signed amount; use
    /// [`PairBalance::owed_by`] to orient it for display. A pair with no
    /// history has a zero balance.
    pub fn pair_balance(&self, user_a: &str, user_b: &str) -> ResultEngine<PairBalance> {
        let pair = PairKey::new(user_a, user_b)?;
        let scope = Scope::personal(user_a);
        let balances = aggregate(&scope, &self.expenses, &self.settlements)?;
        let amount = balances.owed(pair.first(), pair.second())?;
        Ok(PairBalance { pair, amount })
    }

    /// Per-member balances for a group: net position plus per-counterpart
    /// breakdown, sorted by user id.
    ///
    /// Users referenced by the group's records are included even if they are
    /// no longer members; history stands as recorded.
    pub fn group_balances(&self, group_id: Uuid) -> ResultEngine<Vec<UserBalance>> {
        let group = self.group(group_id)?;
        let scope = Scope::Group(group_id);
        let balances = aggregate(&scope, &self.expenses, &self.settlements)?;
        let positions = net_positions(&balances)?;

        let mut users: BTreeSet<String> = balances.users();
        users.extend(group.member_ids().map(ToString::to_string));

        Ok(balances::user_balances(
            users.iter().map(String::as_str),
            &balances,
            &positions,
        ))
    }

    /// The suggested transfers settling every non-zero net position in the
    /// scope, ordered deterministically.
    pub fn suggested_settlements(&self, scope: &Scope) -> ResultEngine<Vec<Transfer>> {
        if let Scope::Group(group_id) = scope {
            self.group(*group_id)?;
        }
        let balances = aggregate(scope, &self.expenses, &self.settlements)?;
        let positions = net_positions(&balances)?;
        simplify(&positions)
    }

    /// Checks a proposed settlement against the rules of its scope.
    ///
    /// On acceptance returns the projected remaining balance, oriented
    /// "payer still owes receiver". Rejections carry a specific reason and
    /// nothing is recorded either way.
    pub fn validate_settlement(&self, proposal: &SettlementProposal) -> ResultEngine<MoneyCents> {
        let (participants, balances): (BTreeSet<String>, PairBalances) = match proposal.group_id {
            Some(group_id) => {
                let group = self.group(group_id)?;
                let scope = Scope::Group(group_id);
                let balances = aggregate(&scope, &self.expenses, &self.settlements)?;
                let members = group.member_ids().map(ToString::to_string).collect();
                (members, balances)
            }
            None => {
                let scope = Scope::personal(proposal.paid_by.clone());
                let balances = aggregate(&scope, &self.expenses, &self.settlements)?;
                (balances.users(), balances)
            }
        };

        validate_settlement(proposal, &participants, &balances)
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
    groups: Vec<Group>,
}

impl LedgerBuilder {
    /// Pass the expense records of the snapshot.
    pub fn expenses(mut self, expenses: Vec<Expense>) -> LedgerBuilder {
        self.expenses = expenses;
        self
    }

    /// Pass the settlement records of the snapshot.
    pub fn settlements(mut self, settlements: Vec<Settlement>) -> LedgerBuilder {
        self.settlements = settlements;
        self
    }

    /// Pass the groups of the snapshot.
    pub fn groups(mut self, groups: Vec<Group>) -> LedgerBuilder {
        self.groups = groups;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        let groups = self
            .groups
            .into_iter()
            .map(|group| (group.id, group))
            .collect();

        Ledger {
            expenses: self.expenses,
            settlements: self.settlements,
            groups,
        }
    }
}
