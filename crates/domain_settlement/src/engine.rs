//! Settlement engine
//!
//! Turns owed shares plus actual payments into net balances and a list of
//! transfers that settles them. The engine is a pure function of its
//! inputs: the same snapshot always yields an equal settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use core_kernel::{Currency, Money, EPSILON};
use domain_bill::{CostShare, ParticipantName};
use crate::balance::NetBalance;
use crate::error::SettlementError;
use crate::matching::{greedy_match, minimal_match, Transfer};
use crate::payment::PaymentRecord;

/// Which matcher produces the transfer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStrategy {
    /// Sorted two-pointer greedy matching
    #[default]
    Greedy,
    /// Fewest possible transfers, falling back to greedy when not applicable
    MinimalTransfers,
}

/// Settlement engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Balances within this distance of zero count as settled
    pub epsilon: Decimal,
    /// Matching strategy
    pub strategy: SettlementStrategy,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            strategy: SettlementStrategy::Greedy,
        }
    }
}

impl SettlementConfig {
    /// Checks that the tolerance is usable
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.epsilon <= Decimal::ZERO {
            return Err(SettlementError::InvalidConfiguration(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.epsilon >= Decimal::ONE {
            return Err(SettlementError::InvalidConfiguration(format!(
                "epsilon must be below one currency unit, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// How total payments compare with the total cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub total_paid: Money,
    pub total_cost: Money,
    /// `total_paid - total_cost`; negative when underpaid
    pub difference: Money,
}

impl PaymentStatus {
    fn new(total_paid: Money, total_cost: Money) -> Result<Self, SettlementError> {
        let difference = total_paid.checked_sub(&total_cost)?;
        Ok(Self {
            total_paid,
            total_cost,
            difference,
        })
    }

    /// Payments cover the cost exactly, within tolerance
    pub fn is_balanced(&self) -> bool {
        self.difference.is_negligible()
    }

    /// Amount still to be paid, if underpaid
    pub fn remaining(&self) -> Option<Money> {
        (!self.is_balanced() && self.difference.is_negative()).then(|| self.difference.abs())
    }

    /// Amount paid beyond the cost, if overpaid
    pub fn surplus(&self) -> Option<Money> {
        (!self.is_balanced() && self.difference.is_positive()).then_some(self.difference)
    }
}

/// Result of one settlement run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub currency: Currency,
    pub net_balances: NetBalance,
    pub transfers: Vec<Transfer>,
    /// Balance left after applying the transfers, only where it exceeds the tolerance
    pub unmatched: BTreeMap<ParticipantName, Money>,
    pub payment_status: PaymentStatus,
    /// Matcher that actually produced `transfers`
    pub strategy: SettlementStrategy,
}

impl Settlement {
    /// No one owes anyone anything
    pub fn is_fully_settled(&self) -> bool {
        self.transfers.is_empty() && self.unmatched.is_empty()
    }

    /// Total a participant sends
    pub fn outgoing(&self, name: &str) -> Money {
        self.sum_transfers(|t| t.from.as_str() == name)
    }

    /// Total a participant receives
    pub fn incoming(&self, name: &str) -> Money {
        self.sum_transfers(|t| t.to.as_str() == name)
    }

    fn sum_transfers(&self, filter: impl Fn(&Transfer) -> bool) -> Money {
        let sum: Decimal = self
            .transfers
            .iter()
            .filter(|t| filter(t))
            .map(|t| t.amount.amount())
            .sum();
        Money::new(sum, self.currency)
    }
}

/// Computes net balances and settling transfers
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: SettlementConfig,
}

impl SettlementEngine {
    /// Creates an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom configuration
    pub fn with_config(config: SettlementConfig) -> Result<Self, SettlementError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settles a bill
    ///
    /// # Arguments
    ///
    /// * `costs` - What each participant owes
    /// * `paid` - What each participant actually paid
    /// * `participants` - Who takes part in the settlement
    ///
    /// # Returns
    ///
    /// Net balances, transfers, any balance the transfers could not cover,
    /// and how total payments compare with the total cost
    ///
    /// # Errors
    ///
    /// - `Money` if costs and payments use different currencies
    /// - `NegativePayment` if the payment record holds a negative amount
    pub fn settle(
        &self,
        costs: &CostShare,
        paid: &PaymentRecord,
        participants: &[ParticipantName],
    ) -> Result<Settlement, SettlementError> {
        self.settle_against(costs, paid, participants, costs.total()?)
    }

    /// Like [`settle`](Self::settle), but reports payments against
    /// `total_cost` instead of the sum of the shares
    ///
    /// The two differ when an item references someone outside
    /// `participants`: that portion is charged to nobody but still counts
    /// toward the bill.
    pub fn settle_against(
        &self,
        costs: &CostShare,
        paid: &PaymentRecord,
        participants: &[ParticipantName],
        total_cost: Money,
    ) -> Result<Settlement, SettlementError> {
        paid.ensure_valid()?;

        for (payer, amount) in paid.iter().filter(|(payer, _)| !participants.contains(payer)) {
            debug!(%payer, %amount, "Ignoring payment from non-participant for net balances");
        }

        let currency = costs.currency();
        let epsilon = self.config.epsilon;
        let net_balances = NetBalance::compute(costs, paid, participants)?;
        let classes = net_balances.classify(epsilon);

        debug!(
            creditors = classes.creditors.len(),
            debtors = classes.debtors.len(),
            settled = classes.settled.len(),
            "Classified balances"
        );

        let (transfers, strategy) = match self.config.strategy {
            SettlementStrategy::Greedy => (
                greedy_match(classes.debtors, classes.creditors, epsilon, currency),
                SettlementStrategy::Greedy,
            ),
            SettlementStrategy::MinimalTransfers => {
                match minimal_match(classes.debtors.clone(), classes.creditors.clone(), epsilon, currency) {
                    Some(transfers) => (transfers, SettlementStrategy::MinimalTransfers),
                    None => {
                        info!(
                            unsettled = classes.debtors.len() + classes.creditors.len(),
                            "Exact matching not applicable, falling back to greedy"
                        );
                        (
                            greedy_match(classes.debtors, classes.creditors, epsilon, currency),
                            SettlementStrategy::Greedy,
                        )
                    }
                }
            }
        };

        let unmatched = unmatched_balances(&net_balances, &transfers, epsilon)?;
        let payment_status = PaymentStatus::new(paid.total_paid()?, total_cost)?;

        Ok(Settlement {
            currency,
            net_balances,
            transfers,
            unmatched,
            payment_status,
            strategy,
        })
    }

    /// Settles a bill that one participant paid in full
    ///
    /// Identical to [`settle`](Self::settle) with a payment record holding
    /// only `payer -> total`, except that total cost is `total`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPayer` if `payer` is not in `participants`
    pub fn settle_single_payer(
        &self,
        costs: &CostShare,
        payer: &ParticipantName,
        total: Money,
        participants: &[ParticipantName],
    ) -> Result<Settlement, SettlementError> {
        if !participants.contains(payer) {
            return Err(SettlementError::UnknownPayer(payer.to_string()));
        }
        let paid = PaymentRecord::single_payer(payer.clone(), total);
        self.settle_against(costs, &paid, participants, total)
    }
}

/// Settles with the default configuration
pub fn settle(
    costs: &CostShare,
    paid: &PaymentRecord,
    participants: &[ParticipantName],
) -> Result<Settlement, SettlementError> {
    SettlementEngine::new().settle(costs, paid, participants)
}

/// Net balance minus what the transfers move, per participant
fn unmatched_balances(
    net_balances: &NetBalance,
    transfers: &[Transfer],
    epsilon: Decimal,
) -> Result<BTreeMap<ParticipantName, Money>, SettlementError> {
    let mut remaining: BTreeMap<ParticipantName, Money> = net_balances
        .iter()
        .map(|(name, net)| (name.clone(), *net))
        .collect();

    for transfer in transfers {
        if let Some(debtor) = remaining.get_mut(transfer.from.as_str()) {
            *debtor = debtor.checked_add(&transfer.amount)?;
        }
        if let Some(creditor) = remaining.get_mut(transfer.to.as_str()) {
            *creditor = creditor.checked_sub(&transfer.amount)?;
        }
    }

    remaining.retain(|_, amount| amount.amount().abs() > epsilon);
    Ok(remaining)
}
