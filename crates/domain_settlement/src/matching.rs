//! Debtor/creditor matching
//!
//! Two matchers are provided:
//!
//! - [`greedy_match`]: sort both sides by amount (largest first) and walk
//!   them with two pointers, paying off the smaller of the two current
//!   amounts each step. Fast, and usually close to the fewest transfers,
//!   but not guaranteed minimal.
//! - [`minimal_match`]: split the balances into the largest possible number
//!   of groups that each sum to zero, then run the greedy matcher inside
//!   each group. A zero-sum group of `k` people needs `k - 1` transfers, so
//!   maximizing the group count minimizes the transfer count. Exponential in
//!   the number of unsettled participants, so it is capped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Currency, Money};
use domain_bill::ParticipantName;
use crate::balance::Position;

/// Largest number of unsettled participants [`minimal_match`] will accept
pub const MAX_EXACT_PARTICIPANTS: usize = 16;

/// A single payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantName,
    pub to: ParticipantName,
    pub amount: Money,
}

/// Largest first; equal amounts by name so the result is deterministic
fn sort_positions(positions: &mut [Position]) {
    positions.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.participant.cmp(&b.participant))
    });
}

/// Greedy two-pointer matching of debtors against creditors
///
/// # Arguments
///
/// * `debtors` - Positive amounts owed
/// * `creditors` - Positive amounts due
/// * `epsilon` - Amounts at or below this are never transferred
/// * `currency` - Currency of the produced transfers
///
/// # Returns
///
/// The transfers, in matching order. When debts and credits do not sum to
/// the same total, whatever cannot be matched is left unmatched.
pub fn greedy_match(
    mut debtors: Vec<Position>,
    mut creditors: Vec<Position>,
    epsilon: Decimal,
    currency: Currency,
) -> Vec<Transfer> {
    sort_positions(&mut debtors);
    sort_positions(&mut creditors);

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].amount.min(creditors[j].amount);

        if amount > epsilon {
            debug!(
                from = %debtors[i].participant,
                to = %creditors[j].participant,
                %amount,
                "Matched transfer"
            );
            transfers.push(Transfer {
                from: debtors[i].participant.clone(),
                to: creditors[j].participant.clone(),
                amount: Money::new(amount, currency),
            });
        }

        debtors[i].amount -= amount;
        creditors[j].amount -= amount;

        // Both sides can be exhausted by the same step; a side at or
        // below the tolerance is settled, so at least one pointer moves
        if debtors[i].amount <= epsilon {
            i += 1;
        }
        if creditors[j].amount <= epsilon {
            j += 1;
        }
    }

    transfers
}

/// Minimum-transfer-count matching for balanced books
///
/// Returns `None` when there are more than [`MAX_EXACT_PARTICIPANTS`]
/// unsettled participants, when debts and credits do not balance within
/// `epsilon`, or when the amounts do not fit in minor units; the caller
/// should fall back to [`greedy_match`].
pub fn minimal_match(
    debtors: Vec<Position>,
    creditors: Vec<Position>,
    epsilon: Decimal,
    currency: Currency,
) -> Option<Vec<Transfer>> {
    let count = debtors.len() + creditors.len();
    if count > MAX_EXACT_PARTICIPANTS {
        return None;
    }

    // Signed balances in minor units: creditors positive, debtors negative.
    // Totals on both sides must fit so every subset sum does too.
    let scale = Decimal::from(10_i64.pow(currency.decimal_places()));
    let tolerance = (epsilon * scale).floor();
    total_minor_units(&debtors, scale)?;
    total_minor_units(&creditors, scale)?;

    let owed = total_amount(&debtors)?;
    let due = total_amount(&creditors)?;
    if (owed - due).abs() > epsilon {
        return None;
    }

    let mut people: Vec<(Position, bool)> = Vec::with_capacity(count);
    let mut signed = Vec::with_capacity(count);
    for d in debtors {
        signed.push(-(d.amount * scale).round());
        people.push((d, false));
    }
    for c in creditors {
        signed.push((c.amount * scale).round());
        people.push((c, true));
    }

    let mut transfers = Vec::new();
    for group in zero_sum_groups(&signed, tolerance) {
        let (mut group_debtors, mut group_creditors) = (Vec::new(), Vec::new());
        for index in group {
            let (position, is_creditor) = &people[index];
            if *is_creditor {
                group_creditors.push(position.clone());
            } else {
                group_debtors.push(position.clone());
            }
        }
        transfers.extend(greedy_match(group_debtors, group_creditors, epsilon, currency));
    }

    Some(transfers)
}

fn total_amount(positions: &[Position]) -> Option<Decimal> {
    positions
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount))
}

/// Sum of the magnitudes in minor units, `None` if it does not fit
fn total_minor_units(positions: &[Position], scale: Decimal) -> Option<Decimal> {
    positions.iter().try_fold(Decimal::ZERO, |acc, p| {
        acc.checked_add(p.amount.checked_mul(scale)?.round())
    })
}

/// Partitions indices into the maximum number of groups summing to zero
///
/// `best[mask]` is the largest number of zero-sum prefixes reachable by
/// removing members of `mask` one at a time; walking back along the
/// recorded choices and cutting at every zero-sum remainder recovers the
/// groups.
fn zero_sum_groups(balances: &[Decimal], tolerance: Decimal) -> Vec<Vec<usize>> {
    let n = balances.len();
    if n == 0 {
        return Vec::new();
    }

    let full = (1usize << n) - 1;
    let mut sums = vec![Decimal::ZERO; full + 1];
    let mut best = vec![0u32; full + 1];
    let mut removed = vec![0usize; full + 1];

    for mask in 1..=full {
        let low = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + balances[low];

        let mut remaining = mask;
        let mut chosen = low;
        let mut chosen_best = 0;
        let mut first = true;
        while remaining != 0 {
            let i = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            let candidate = best[mask ^ (1 << i)];
            if first || candidate > chosen_best {
                chosen = i;
                chosen_best = candidate;
                first = false;
            }
        }

        removed[mask] = chosen;
        best[mask] = chosen_best + u32::from(sums[mask].abs() <= tolerance);
    }

    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut mask = full;
    while mask != 0 {
        let i = removed[mask];
        current.push(i);
        mask ^= 1 << i;
        if mask == 0 || sums[mask].abs() <= tolerance {
            groups.push(std::mem::take(&mut current));
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::EPSILON;
    use rust_decimal_macros::dec;

    fn pos(name: &str, amount: Decimal) -> Position {
        Position {
            participant: ParticipantName::new(name).unwrap(),
            amount,
        }
    }

    #[test]
    fn test_single_pair() {
        let transfers = greedy_match(
            vec![pos("B", dec!(25))],
            vec![pos("A", dec!(25))],
            EPSILON,
            Currency::USD,
        );

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from.as_str(), "B");
        assert_eq!(transfers[0].to.as_str(), "A");
        assert_eq!(transfers[0].amount.amount(), dec!(25));
    }

    #[test]
    fn test_exact_match_advances_both_pointers() {
        let transfers = greedy_match(
            vec![pos("C", dec!(10)), pos("D", dec!(5))],
            vec![pos("A", dec!(10)), pos("B", dec!(5))],
            EPSILON,
            Currency::USD,
        );

        let pairs: Vec<(&str, &str)> = transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str()))
            .collect();
        assert_eq!(pairs, vec![("C", "A"), ("D", "B")]);
    }

    #[test]
    fn test_largest_amounts_matched_first() {
        let transfers = greedy_match(
            vec![pos("D1", dec!(10)), pos("D2", dec!(40))],
            vec![pos("C1", dec!(50))],
            EPSILON,
            Currency::USD,
        );

        assert_eq!(transfers[0].from.as_str(), "D2");
        assert_eq!(transfers[0].amount.amount(), dec!(40));
        assert_eq!(transfers[1].from.as_str(), "D1");
    }

    #[test]
    fn test_unmatched_debt_left_over() {
        let transfers = greedy_match(
            vec![pos("C", dec!(20))],
            vec![pos("A", dec!(10))],
            EPSILON,
            Currency::USD,
        );

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount.amount(), dec!(10));
    }

    #[test]
    fn test_zero_tolerance_still_terminates() {
        let transfers = greedy_match(
            vec![pos("B", dec!(25)), pos("C", dec!(10))],
            vec![pos("A", dec!(30)), pos("D", dec!(5))],
            Decimal::ZERO,
            Currency::USD,
        );

        let total: Decimal = transfers.iter().map(|t| t.amount.amount()).sum();
        assert_eq!(total, dec!(35));
        assert_eq!(transfers.len(), 3);
    }

    #[test]
    fn test_remainder_at_tolerance_is_settled() {
        let transfers = greedy_match(
            vec![pos("B", dec!(10.01))],
            vec![pos("A", dec!(10)), pos("C", dec!(0.02))],
            EPSILON,
            Currency::USD,
        );

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].to.as_str(), "A");
    }

    #[test]
    fn test_empty_sides() {
        assert!(greedy_match(vec![], vec![pos("A", dec!(5))], EPSILON, Currency::USD).is_empty());
        assert!(greedy_match(vec![pos("A", dec!(5))], vec![], EPSILON, Currency::USD).is_empty());
    }

    #[test]
    fn test_minimal_matches_greedy_on_aligned_pairs() {
        let debtors = vec![pos("D6", dec!(6)), pos("D7", dec!(7)), pos("D3", dec!(3))];
        let creditors = vec![pos("C7", dec!(7)), pos("C6", dec!(6)), pos("C3", dec!(3))];

        let greedy = greedy_match(debtors.clone(), creditors.clone(), EPSILON, Currency::USD);
        let minimal = minimal_match(debtors, creditors, EPSILON, Currency::USD).unwrap();

        assert_eq!(greedy.len(), 3);
        assert_eq!(minimal.len(), 3);
    }

    #[test]
    fn test_minimal_beats_greedy() {
        // Greedy: Da->Ca 4, Db->Ca 2, Db->Cb 1, Dc->Cb 3.
        // Exact: {Da, Cb} and {Db, Dc, Ca} are independent zero-sum groups.
        let debtors = vec![pos("Da", dec!(4)), pos("Db", dec!(3)), pos("Dc", dec!(3))];
        let creditors = vec![pos("Ca", dec!(6)), pos("Cb", dec!(4))];

        let greedy = greedy_match(debtors.clone(), creditors.clone(), EPSILON, Currency::USD);
        let minimal = minimal_match(debtors, creditors, EPSILON, Currency::USD).unwrap();

        assert_eq!(greedy.len(), 4);
        assert_eq!(minimal.len(), 3);
        assert!(minimal
            .iter()
            .any(|t| t.from.as_str() == "Da" && t.to.as_str() == "Cb" && t.amount.amount() == dec!(4)));
    }

    #[test]
    fn test_minimal_refuses_unbalanced_books() {
        let result = minimal_match(
            vec![pos("C", dec!(20))],
            vec![pos("A", dec!(10))],
            EPSILON,
            Currency::USD,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_minimal_declines_amounts_too_large_to_scale() {
        let huge = Decimal::MAX - dec!(1);
        let result = minimal_match(
            vec![pos("B", huge)],
            vec![pos("A", huge)],
            EPSILON,
            Currency::USD,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_sum_groups_partition_everyone() {
        let groups = zero_sum_groups(
            &[dec!(-300), dec!(300), dec!(-500), dec!(200), dec!(300)],
            Decimal::ZERO,
        );

        let mut all: Vec<usize> = groups.iter().flatten().copied().collect();
        all.sort();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
        assert_eq!(groups.len(), 2);
    }
}
