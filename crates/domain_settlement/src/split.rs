//! One-shot split pipeline
//!
//! Allocates costs for a bill snapshot and settles them against the
//! recorded payments. While the bill is still being entered (no payer chosen
//! yet, or no items) the pipeline reports that no result is available
//! instead of failing.

use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{Currency, Money};
use domain_bill::{
    allocate_costs, Bill, BillValidator, Item, ParticipantName, Roster, SkippedItem,
};
use crate::engine::{Settlement, SettlementConfig, SettlementEngine};
use crate::error::SettlementError;
use crate::payment::PayerMode;

/// Why a snapshot has no result yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoResultReason {
    /// Single-payer mode without a payer
    NoPayerSelected,
    /// Nothing to split
    NoItems,
}

/// A participant's share, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedShare {
    pub participant: ParticipantName,
    pub amount: Money,
}

/// Everything computed for one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Sum of the prices of all allocated items
    pub total: Money,
    /// Owed amounts, largest first
    pub shares: Vec<RankedShare>,
    pub skipped_items: Vec<SkippedItem>,
    pub settlement: Settlement,
    /// Non-fatal inconsistencies found in the bill
    pub warnings: Vec<String>,
}

/// Result of [`compute_split`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SplitOutcome {
    NoResult { reason: NoResultReason },
    Computed(Box<SplitReport>),
}

impl SplitOutcome {
    pub fn report(&self) -> Option<&SplitReport> {
        match self {
            SplitOutcome::Computed(report) => Some(report),
            SplitOutcome::NoResult { .. } => None,
        }
    }

    pub fn no_result_reason(&self) -> Option<NoResultReason> {
        match self {
            SplitOutcome::NoResult { reason } => Some(*reason),
            SplitOutcome::Computed(_) => None,
        }
    }
}

/// Runs allocation and settlement for a bill
pub fn compute_split(
    bill: &Bill,
    mode: &PayerMode,
    config: SettlementConfig,
) -> Result<SplitOutcome, SettlementError> {
    compute_split_parts(bill.roster(), bill.items(), bill.currency(), mode, config)
}

/// Runs allocation and settlement for a roster and item list
///
/// The items need not have been checked against the roster; stale
/// references and invalid items are tolerated the same way the allocator
/// tolerates them, and reported in `warnings` and `skipped_items`.
///
/// # Errors
///
/// - `InvalidConfiguration` if `config` is unusable
/// - `UnknownPayer` if single-payer mode names someone not on the roster
/// - `NegativePayment` or `Money` if the payment record is malformed
pub fn compute_split_parts(
    roster: &Roster,
    items: &[Item],
    currency: Currency,
    mode: &PayerMode,
    config: SettlementConfig,
) -> Result<SplitOutcome, SettlementError> {
    let engine = SettlementEngine::with_config(config)?;

    if matches!(mode, PayerMode::Single { payer: None }) {
        return Ok(SplitOutcome::NoResult {
            reason: NoResultReason::NoPayerSelected,
        });
    }
    if items.is_empty() {
        return Ok(SplitOutcome::NoResult {
            reason: NoResultReason::NoItems,
        });
    }

    let validation = BillValidator::validate_parts(roster, items, currency);
    let allocation = allocate_costs(roster.as_slice(), items, currency);
    let participants = roster.as_slice();

    let settlement = match mode {
        PayerMode::Single { payer: Some(payer) } => {
            engine.settle_single_payer(&allocation.shares, payer, allocation.total, participants)?
        }
        PayerMode::Multi { payments } => {
            engine.settle_against(&allocation.shares, payments, participants, allocation.total)?
        }
        PayerMode::Single { payer: None } => {
            return Ok(SplitOutcome::NoResult {
                reason: NoResultReason::NoPayerSelected,
            })
        }
    };

    info!(
        total = %allocation.total,
        participants = participants.len(),
        items = items.len(),
        skipped = allocation.skipped_items.len(),
        transfers = settlement.transfers.len(),
        strategy = ?settlement.strategy,
        "Split computed"
    );

    let shares = allocation
        .shares
        .ranked()
        .into_iter()
        .map(|(participant, amount)| RankedShare {
            participant: participant.clone(),
            amount,
        })
        .collect();

    Ok(SplitOutcome::Computed(Box::new(SplitReport {
        total: allocation.total,
        shares,
        skipped_items: allocation.skipped_items,
        settlement,
        warnings: validation.warnings,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentRecord;
    use rust_decimal_macros::dec;

    fn dinner() -> Bill {
        let mut bill = Bill::new(Currency::USD);
        for n in ["A", "B"] {
            bill.add_participant(n).unwrap();
        }
        let item = Item::equal_split("Dinner", Money::new(dec!(50), Currency::USD), bill.roster().iter())
            .unwrap();
        bill.add_item(item).unwrap();
        bill
    }

    #[test]
    fn test_no_payer_selected() {
        let outcome = compute_split(&dinner(), &PayerMode::no_payer(), SettlementConfig::default()).unwrap();
        assert_eq!(outcome.no_result_reason(), Some(NoResultReason::NoPayerSelected));
    }

    #[test]
    fn test_no_payer_takes_priority_over_no_items() {
        let bill = Bill::new(Currency::USD);
        let outcome = compute_split(&bill, &PayerMode::no_payer(), SettlementConfig::default()).unwrap();
        assert_eq!(outcome.no_result_reason(), Some(NoResultReason::NoPayerSelected));
    }

    #[test]
    fn test_no_items() {
        let mut bill = Bill::new(Currency::USD);
        let a = bill.add_participant("A").unwrap();
        let outcome = compute_split(&bill, &PayerMode::single(a), SettlementConfig::default()).unwrap();
        assert_eq!(outcome.no_result_reason(), Some(NoResultReason::NoItems));
    }

    #[test]
    fn test_single_payer_pipeline() {
        let bill = dinner();
        let payer = ParticipantName::new("A").unwrap();

        let outcome = compute_split(&bill, &PayerMode::single(payer), SettlementConfig::default()).unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.total.amount(), dec!(50));
        assert_eq!(report.settlement.transfers.len(), 1);
        assert_eq!(report.settlement.transfers[0].from.as_str(), "B");
        assert!(report.settlement.payment_status.is_balanced());
    }

    #[test]
    fn test_multi_payer_evenly_paid_is_settled() {
        let bill = dinner();
        let payments = PaymentRecord::new(Currency::USD)
            .with_payment(ParticipantName::new("A").unwrap(), Money::new(dec!(25), Currency::USD))
            .unwrap()
            .with_payment(ParticipantName::new("B").unwrap(), Money::new(dec!(25), Currency::USD))
            .unwrap();

        let outcome = compute_split(&bill, &PayerMode::multi(payments), SettlementConfig::default()).unwrap();

        assert!(outcome.report().unwrap().settlement.is_fully_settled());
    }

    #[test]
    fn test_unknown_payer_is_an_error() {
        let payer = ParticipantName::new("Z").unwrap();
        let result = compute_split(&dinner(), &PayerMode::single(payer), SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::UnknownPayer(_))));
    }

    #[test]
    fn test_outcome_json_status_tag() {
        let outcome = SplitOutcome::NoResult {
            reason: NoResultReason::NoItems,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_result");
        assert_eq!(json["reason"], "no_items");
    }
}
