//! Split DTOs

use std::collections::BTreeMap;

use core_kernel::{Currency, Money, SettlementId};
use domain_bill::{Bill, BillError, Involvement, Item, ParticipantName, SkippedItem, Weight};
use domain_settlement::{
    NoResultReason, PayerMode, PaymentRecord, SettlementStrategy, SplitOutcome, Standing,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::ApiError;

fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_positive"))
    }
}

fn non_negative_amounts(values: &BTreeMap<String, Decimal>) -> Result<(), ValidationError> {
    if values.values().all(|v| *v >= Decimal::ZERO) {
        Ok(())
    } else {
        Err(ValidationError::new("must_not_be_negative"))
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SplitRequest {
    /// ISO 4217 code; the server default when absent
    pub currency: Option<String>,
    #[validate(length(min = 1))]
    pub participants: Vec<String>,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    /// Single-payer mode payer; ignored when `payments` is present
    pub payer: Option<String>,
    /// Multi-payer mode payments by participant name
    #[validate(custom(function = "non_negative_amounts"))]
    pub payments: Option<BTreeMap<String, Decimal>>,
    pub strategy: Option<SettlementStrategy>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(custom(function = "positive_amount"))]
    pub price: Decimal,
    #[validate(length(min = 1), nested)]
    pub involved: Vec<InvolvementRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct InvolvementRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "positive_amount"))]
    pub weight: Option<Decimal>,
}

impl SplitRequest {
    /// Requested currency, or `default`
    pub fn currency(&self, default: Currency) -> Result<Currency, ApiError> {
        match &self.currency {
            Some(code) => Ok(Currency::from_code(code)?),
            None => Ok(default),
        }
    }

    /// Assembles the participants and items into a consistent bill
    pub fn to_bill(&self, currency: Currency) -> Result<Bill, BillError> {
        let mut bill = Bill::new(currency);
        for name in &self.participants {
            bill.add_participant(name)?;
        }
        for item in &self.items {
            let involved = item
                .involved
                .iter()
                .map(|entry| -> Result<Involvement, BillError> {
                    let participant = ParticipantName::new(&entry.name)?;
                    Ok(match entry.weight {
                        Some(weight) => Involvement::weighted(participant, Weight::new(weight)?),
                        None => Involvement::new(participant),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            bill.add_item(Item::new(&item.name, Money::new(item.price, currency), involved)?)?;
        }
        Ok(bill)
    }

    /// `payments` selects multi-payer mode; otherwise single-payer with the optional payer
    pub fn payer_mode(&self, currency: Currency) -> Result<PayerMode, ApiError> {
        match &self.payments {
            Some(payments) => {
                let mut record = PaymentRecord::new(currency);
                for (name, amount) in payments {
                    record.record(ParticipantName::new(name)?, Money::new(*amount, currency))?;
                }
                Ok(PayerMode::multi(record))
            }
            None => {
                let payer = self.payer.as_deref().map(ParticipantName::new).transpose()?;
                Ok(PayerMode::Single { payer })
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShareResponse {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct NetBalanceResponse {
    pub name: String,
    pub net: Decimal,
    /// `creditor`, `debtor` or `settled`
    pub standing: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransferResponse {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentStatusResponse {
    pub total_paid: Decimal,
    pub total_cost: Decimal,
    pub difference: Decimal,
    pub balanced: bool,
    pub remaining: Option<Decimal>,
    pub surplus: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    /// `computed` or `no_result`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoResultReason>,
    pub currency: Currency,
    pub total: Option<Decimal>,
    pub shares: Vec<ShareResponse>,
    pub net_balances: Vec<NetBalanceResponse>,
    pub transfers: Vec<TransferResponse>,
    pub payment_status: Option<PaymentStatusResponse>,
    pub skipped_items: Vec<SkippedItem>,
    pub warnings: Vec<String>,
    /// Identifies this response; not derived from the input
    pub settlement_id: Option<String>,
    pub strategy: Option<SettlementStrategy>,
}

/// Amount as shown to a person: exactly the currency's minor-unit scale
fn display(money: Money) -> Decimal {
    let mut amount = money.round_to_currency().amount();
    amount.rescale(money.currency().decimal_places());
    amount
}

impl SplitResponse {
    pub fn from_outcome(outcome: SplitOutcome, currency: Currency, epsilon: Decimal) -> Self {
        let report = match outcome {
            SplitOutcome::NoResult { reason } => {
                return Self {
                    status: "no_result".to_string(),
                    reason: Some(reason),
                    currency,
                    total: None,
                    shares: Vec::new(),
                    net_balances: Vec::new(),
                    transfers: Vec::new(),
                    payment_status: None,
                    skipped_items: Vec::new(),
                    warnings: Vec::new(),
                    settlement_id: None,
                    strategy: None,
                }
            }
            SplitOutcome::Computed(report) => *report,
        };

        let settlement = report.settlement;
        let net_balances = settlement
            .net_balances
            .iter()
            .map(|(name, net)| NetBalanceResponse {
                name: name.to_string(),
                net: display(*net),
                standing: match settlement.net_balances.standing(name.as_str(), epsilon) {
                    Standing::Creditor(_) => "creditor",
                    Standing::Debtor(_) => "debtor",
                    Standing::Settled => "settled",
                }
                .to_string(),
            })
            .collect();
        let status = settlement.payment_status;

        Self {
            status: "computed".to_string(),
            reason: None,
            currency,
            total: Some(display(report.total)),
            shares: report
                .shares
                .into_iter()
                .map(|share| ShareResponse {
                    name: share.participant.to_string(),
                    amount: display(share.amount),
                })
                .collect(),
            net_balances,
            transfers: settlement
                .transfers
                .into_iter()
                .map(|t| TransferResponse {
                    from: t.from.to_string(),
                    to: t.to.to_string(),
                    amount: display(t.amount),
                })
                .collect(),
            payment_status: Some(PaymentStatusResponse {
                total_paid: display(status.total_paid),
                total_cost: display(status.total_cost),
                difference: display(status.difference),
                balanced: status.is_balanced(),
                remaining: status.remaining().map(display),
                surplus: status.surplus().map(display),
            }),
            skipped_items: report.skipped_items,
            warnings: report.warnings,
            settlement_id: Some(SettlementId::new().to_string()),
            strategy: Some(settlement.strategy),
        }
    }
}
