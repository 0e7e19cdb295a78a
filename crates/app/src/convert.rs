//! Conversions from wire records to validated engine types.
//!
//! The engine enforces its invariants at construction, so every record in a
//! snapshot goes through the engine constructors here; a bad record fails the
//! whole load rather than silently entering the ledger. Roles cross the
//! boundary as their canonical strings and are re-parsed by the engine.

use api_types::record::{ExpenseRecord, GroupRecord, LedgerFile, MemberRecord, SettlementRecord};
use api_types::settlement::SettlementProposal as ProposalRequest;
use engine::{
    EngineError, Expense, Group, Ledger, Member, MemberRole, MoneyCents, Settlement,
    SettlementProposal, Split,
};

fn member(record: MemberRecord) -> Result<Member, EngineError> {
    Ok(Member {
        user_id: record.user_id,
        role: MemberRole::try_from(record.role.as_str())?,
        joined_at: record.joined_at,
    })
}

fn group(record: GroupRecord) -> Result<Group, EngineError> {
    let members = record
        .members
        .into_iter()
        .map(member)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Group::new(
        record.id,
        record.name,
        record.created_by,
        record.created_at,
        members,
    ))
}

fn expense(record: ExpenseRecord) -> Result<Expense, EngineError> {
    let splits = record
        .splits
        .into_iter()
        .map(|split| Split {
            user_id: split.user_id,
            amount: MoneyCents::new(split.amount_minor),
            settled: split.settled,
        })
        .collect();

    Expense::new(
        record.id,
        record.group_id,
        record.paid_by,
        MoneyCents::new(record.amount_minor),
        splits,
        record.occurred_at,
        record.category,
        record.created_by,
    )
}

fn settlement(record: SettlementRecord) -> Result<Settlement, EngineError> {
    Settlement::new(
        record.id,
        record.group_id,
        record.paid_by,
        record.received_by,
        MoneyCents::new(record.amount_minor),
        record.occurred_at,
        record.note,
    )
}

/// Maps a settlement proposal request into the engine's type.
pub fn proposal(request: ProposalRequest) -> SettlementProposal {
    SettlementProposal {
        group_id: request.group_id,
        paid_by: request.paid_by,
        received_by: request.received_by,
        amount: MoneyCents::new(request.amount_minor),
    }
}

/// Builds a validated [`Ledger`] snapshot from a wire-format file.
pub fn ledger_from_file(file: LedgerFile) -> Result<Ledger, EngineError> {
    let expenses = file
        .expenses
        .into_iter()
        .map(expense)
        .collect::<Result<Vec<_>, _>>()?;
    let settlements = file
        .settlements
        .into_iter()
        .map(settlement)
        .collect::<Result<Vec<_>, _>>()?;
    let groups = file
        .groups
        .into_iter()
        .map(group)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ledger::builder()
        .expenses(expenses)
        .settlements(settlements)
        .groups(groups)
        .build())
}

#[cfg(test)]
mod tests {
    use engine::Scope;
    use serde_json::json;

    use super::*;

    #[test]
    fn loads_a_snapshot_and_answers_queries() {
        let file: LedgerFile = serde_json::from_value(json!({
            "groups": [{
                "id": "5f2c7a9e-0d1b-4a6e-9c3f-111111111111",
                "name": "Trip",
                "created_by": "alice",
                "created_at": "2026-08-01T12:00:00Z",
                "members": [
                    { "user_id": "alice", "role": "member", "joined_at": "2026-08-01T12:00:00Z" },
                    { "user_id": "bob", "role": "member", "joined_at": "2026-08-01T12:00:00Z" }
                ]
            }],
            "expenses": [{
                "id": "5f2c7a9e-0d1b-4a6e-9c3f-222222222222",
                "group_id": "5f2c7a9e-0d1b-4a6e-9c3f-111111111111",
                "paid_by": "alice",
                "amount_minor": 1000,
                "splits": [{ "user_id": "bob", "amount_minor": 1000 }],
                "occurred_at": "2026-08-02T12:00:00Z",
                "category": "food",
                "created_by": "alice"
            }],
            "settlements": []
        }))
        .unwrap();

        let ledger = ledger_from_file(file).unwrap();
        let group_id = "5f2c7a9e-0d1b-4a6e-9c3f-111111111111".parse().unwrap();
        let group = ledger.group(group_id).unwrap();
        // Roles come through the canonical-string round trip, and the
        // creator is promoted.
        let alice = group.members.iter().find(|m| m.user_id == "alice").unwrap();
        assert_eq!(alice.role, MemberRole::Admin);
        let bob = group.members.iter().find(|m| m.user_id == "bob").unwrap();
        assert_eq!(bob.role, MemberRole::Member);

        let transfers = ledger
            .suggested_settlements(&Scope::Group(group_id))
            .unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from, "bob");
        assert_eq!(transfers[0].amount, MoneyCents::new(1000));
    }

    #[test]
    fn rejects_an_invalid_record_at_load() {
        let file: LedgerFile = serde_json::from_value(json!({
            "expenses": [{
                "id": "5f2c7a9e-0d1b-4a6e-9c3f-333333333333",
                "group_id": null,
                "paid_by": "alice",
                "amount_minor": 1000,
                "splits": [{ "user_id": "bob", "amount_minor": 250 }],
                "occurred_at": "2026-08-02T12:00:00Z",
                "category": null,
                "created_by": "alice"
            }]
        }))
        .unwrap();

        assert!(matches!(
            ledger_from_file(file).unwrap_err(),
            EngineError::SplitMismatch(_)
        ));
    }

    #[test]
    fn proposal_request_maps_to_engine_proposal() {
        let request: ProposalRequest = serde_json::from_value(json!({
            "group_id": null,
            "paid_by": "a",
            "received_by": "b",
            "amount_minor": 700
        }))
        .unwrap();

        let proposal = proposal(request);
        assert_eq!(proposal.paid_by, "a");
        assert_eq!(proposal.received_by, "b");
        assert_eq!(proposal.amount, MoneyCents::new(700));
    }
}
