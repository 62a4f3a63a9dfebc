//! Who actually paid
//!
//! In single-payer mode one participant covers the whole bill. In
//! multi-payer mode payments are an arbitrary mapping, and their sum is
//! allowed to differ from the bill total; the difference is reported, not
//! treated as an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Currency, Money, MoneyError};
use domain_bill::ParticipantName;
use crate::error::SettlementError;

/// Amounts actually paid, per participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    currency: Currency,
    payments: BTreeMap<ParticipantName, Money>,
}

impl PaymentRecord {
    /// Creates an empty record
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            payments: BTreeMap::new(),
        }
    }

    /// A record in which `payer` covered the whole `total`
    pub fn single_payer(payer: ParticipantName, total: Money) -> Self {
        let mut payments = BTreeMap::new();
        payments.insert(payer, total);
        Self {
            currency: total.currency(),
            payments,
        }
    }

    /// Sets what `participant` paid, replacing any earlier amount
    ///
    /// # Errors
    ///
    /// - `NegativePayment` if `amount` is below zero
    /// - `Money` if `amount` is in another currency
    pub fn record(&mut self, participant: ParticipantName, amount: Money) -> Result<(), SettlementError> {
        self.check_amount(&participant, &amount)?;
        self.payments.insert(participant, amount);
        Ok(())
    }

    /// Builder-style variant of [`record`](Self::record)
    pub fn with_payment(mut self, participant: ParticipantName, amount: Money) -> Result<Self, SettlementError> {
        self.record(participant, amount)?;
        Ok(self)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// What `name` paid, zero if nothing was recorded
    pub fn paid(&self, name: &str) -> Money {
        self.payments
            .get(name)
            .copied()
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantName, &Money)> {
        self.payments.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Sum of every recorded payment
    pub fn total_paid(&self) -> Result<Money, MoneyError> {
        Money::checked_sum(self.payments.values(), self.currency)
    }

    /// Re-checks amounts that may have bypassed [`record`](Self::record), e.g. via deserialization
    pub fn ensure_valid(&self) -> Result<(), SettlementError> {
        self.payments
            .iter()
            .try_for_each(|(participant, amount)| self.check_amount(participant, amount))
    }

    fn check_amount(&self, participant: &ParticipantName, amount: &Money) -> Result<(), SettlementError> {
        if amount.currency() != self.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                amount.currency().to_string(),
            )
            .into());
        }
        if amount.is_negative() {
            return Err(SettlementError::NegativePayment {
                participant: participant.to_string(),
                amount: amount.amount(),
            });
        }
        Ok(())
    }
}

/// How the payments for a bill were made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PayerMode {
    /// One participant paid everything; `None` until a payer is chosen
    Single { payer: Option<ParticipantName> },
    /// Payments spread across participants
    Multi { payments: PaymentRecord },
}

impl PayerMode {
    pub fn single(payer: ParticipantName) -> Self {
        PayerMode::Single { payer: Some(payer) }
    }

    /// Single-payer mode before anyone has been chosen
    pub fn no_payer() -> Self {
        PayerMode::Single { payer: None }
    }

    pub fn multi(payments: PaymentRecord) -> Self {
        PayerMode::Multi { payments }
    }
}
