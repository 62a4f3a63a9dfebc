//! Net balances
//!
//! A participant's net balance is what they paid minus what they owe.
//! Positive means the group owes them (creditor), negative means they owe
//! the group (debtor). Anything within the tolerance of zero is settled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Currency, Money, MoneyError};
use domain_bill::{CostShare, ParticipantName};
use crate::payment::PaymentRecord;

/// Signed paid-minus-owed amount per participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    currency: Currency,
    balances: BTreeMap<ParticipantName, Money>,
}

/// Where a participant stands after netting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "standing", content = "amount", rename_all = "snake_case")]
pub enum Standing {
    /// Is owed this (positive) amount
    Creditor(Money),
    /// Owes this (positive) amount
    Debtor(Money),
    /// Within tolerance of zero
    Settled,
}

/// One side of the matching: a participant and an outstanding magnitude
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub participant: ParticipantName,
    pub amount: Decimal,
}

/// Net balances split by sign
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Participants owed money, magnitudes positive
    pub creditors: Vec<Position>,
    /// Participants owing money, magnitudes positive
    pub debtors: Vec<Position>,
    /// Participants within tolerance of zero
    pub settled: Vec<ParticipantName>,
}

impl NetBalance {
    /// Computes `paid - owed` for every participant
    ///
    /// Payments and shares for names outside `participants` do not produce
    /// a balance entry.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` if costs and payments use different currencies
    pub fn compute(
        costs: &CostShare,
        paid: &PaymentRecord,
        participants: &[ParticipantName],
    ) -> Result<Self, MoneyError> {
        if costs.currency() != paid.currency() {
            return Err(MoneyError::CurrencyMismatch(
                costs.currency().to_string(),
                paid.currency().to_string(),
            ));
        }

        let mut balances = BTreeMap::new();
        for name in participants {
            let net = paid.paid(name.as_str()).checked_sub(&costs.owed(name.as_str()))?;
            balances.insert(name.clone(), net);
        }

        Ok(Self {
            currency: costs.currency(),
            balances,
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Net balance of `name`, zero if unknown
    pub fn net(&self, name: &str) -> Money {
        self.balances
            .get(name)
            .copied()
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    pub fn get(&self, name: &str) -> Option<&Money> {
        self.balances.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantName, &Money)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Classifies `name` using `epsilon` as the settled tolerance
    pub fn standing(&self, name: &str, epsilon: Decimal) -> Standing {
        let net = self.net(name);
        if net.amount() > epsilon {
            Standing::Creditor(net)
        } else if net.amount() < -epsilon {
            Standing::Debtor(net.abs())
        } else {
            Standing::Settled
        }
    }

    /// Splits every balance into creditors, debtors and settled participants
    ///
    /// Lists are in name order; the matcher applies its own ordering.
    pub fn classify(&self, epsilon: Decimal) -> Classification {
        let mut classification = Classification::default();
        for (name, net) in &self.balances {
            let amount = net.amount();
            if amount < -epsilon {
                classification.debtors.push(Position {
                    participant: name.clone(),
                    amount: -amount,
                });
            } else if amount > epsilon {
                classification.creditors.push(Position {
                    participant: name.clone(),
                    amount,
                });
            } else {
                classification.settled.push(name.clone());
            }
        }
        classification
    }
}
