//! Debt simplification: a reduced set of transfers clearing all net
//! positions.
//!
//! Exact transaction-count minimization is a hard combinatorial problem; the
//! greedy largest-creditor vs largest-debtor pairing is the standard
//! heuristic, bounded by n-1 transfers for n participants. All tie-breaks use
//! the total order on user ids, so identical inputs always produce identical
//! output.

use std::collections::BTreeMap;

use crate::{MoneyCents, ResultEngine, balances::check_conservation};

/// A suggested settling payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: MoneyCents,
}

/// Computes transfers that drive every net position to exactly zero.
///
/// The input positions must sum to zero (they come from
/// [`net_positions`](crate::net_positions)); anything else is rejected as a
/// conservation violation. Users already at zero are excluded, and an
/// all-zero input yields an empty list.
pub fn simplify(positions: &BTreeMap<String, MoneyCents>) -> ResultEngine<Vec<Transfer>> {
    check_conservation(positions)?;

    let mut remaining: BTreeMap<&str, MoneyCents> = positions
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(user_id, amount)| (user_id.as_str(), *amount))
        .collect();

    let mut transfers = Vec::new();

    loop {
        // Ascending id iteration makes the first maximum the lowest id, which
        // is the required tie-break.
        let mut creditor: Option<(&str, MoneyCents)> = None;
        let mut debtor: Option<(&str, MoneyCents)> = None;
        for (user_id, amount) in &remaining {
            if amount.is_positive() {
                if creditor.is_none_or(|(_, best)| *amount > best) {
                    creditor = Some((*user_id, *amount));
                }
            } else if debtor.is_none_or(|(_, best)| *amount < best) {
                debtor = Some((*user_id, *amount));
            }
        }

        let (Some((creditor_id, credit)), Some((debtor_id, debit))) = (creditor, debtor) else {
            break;
        };

        let amount = credit.min(-debit);
        transfers.push(Transfer {
            from: debtor_id.to_string(),
            to: creditor_id.to_string(),
            amount,
        });

        for (user_id, delta) in [(creditor_id, -amount), (debtor_id, amount)] {
            let settled = match remaining.get_mut(user_id) {
                Some(position) => {
                    *position += delta;
                    position.is_zero()
                }
                None => false,
            };
            if settled {
                remaining.remove(user_id);
            }
        }
    }

    Ok(transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    fn positions(entries: &[(&str, i64)]) -> BTreeMap<String, MoneyCents> {
        entries
            .iter()
            .map(|(user_id, amount)| (user_id.to_string(), MoneyCents::new(*amount)))
            .collect()
    }

    fn apply(positions: &BTreeMap<String, MoneyCents>, transfers: &[Transfer]) -> BTreeMap<String, MoneyCents> {
        let mut result = positions.clone();
        for transfer in transfers {
            *result.get_mut(&transfer.from).unwrap() += transfer.amount;
            *result.get_mut(&transfer.to).unwrap() -= transfer.amount;
        }
        result
    }

    #[test]
    fn even_three_way_split() {
        let positions = positions(&[("a", 6000), ("b", -3000), ("c", -3000)]);
        let transfers = simplify(&positions).unwrap();

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "b".to_string(),
                    to: "a".to_string(),
                    amount: MoneyCents::new(3000),
                },
                Transfer {
                    from: "c".to_string(),
                    to: "a".to_string(),
                    amount: MoneyCents::new(3000),
                },
            ]
        );
    }

    #[test]
    fn transfers_zero_all_positions() {
        let positions = positions(&[("a", 7500), ("b", -2500), ("c", -4000), ("d", -1000)]);
        let transfers = simplify(&positions).unwrap();

        let after = apply(&positions, &transfers);
        assert!(after.values().all(|p| p.is_zero()));
    }

    #[test]
    fn emits_at_most_n_minus_one_transfers() {
        let positions = positions(&[
            ("a", 100),
            ("b", 350),
            ("c", -50),
            ("d", -200),
            ("e", -175),
            ("f", -25),
        ]);
        let transfers = simplify(&positions).unwrap();
        assert!(transfers.len() <= 5);
        assert!(apply(&positions, &transfers).values().all(|p| p.is_zero()));
    }

    #[test]
    fn already_settled_yields_empty_list() {
        assert!(simplify(&positions(&[])).unwrap().is_empty());
        assert!(simplify(&positions(&[("a", 0), ("b", 0)])).unwrap().is_empty());
    }

    #[test]
    fn ties_break_by_lowest_user_id() {
        let positions = positions(&[("b", 1000), ("a", 1000), ("d", -1000), ("c", -1000)]);
        let transfers = simplify(&positions).unwrap();

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "c".to_string(),
                    to: "a".to_string(),
                    amount: MoneyCents::new(1000),
                },
                Transfer {
                    from: "d".to_string(),
                    to: "b".to_string(),
                    amount: MoneyCents::new(1000),
                },
            ]
        );
    }

    #[test]
    fn deterministic_for_identical_input() {
        let positions = positions(&[("a", 300), ("b", -100), ("c", -100), ("d", -100)]);
        let first = simplify(&positions).unwrap();
        let second = simplify(&positions).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_unbalanced_positions() {
        let err = simplify(&positions(&[("a", 100)])).unwrap_err();
        assert!(matches!(err, EngineError::ConservationViolation(_)));
    }
}
