//! Settlement domain errors

use core_kernel::MoneyError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while settling a bill
#[derive(Debug, Error)]
pub enum SettlementError {
    /// A payment amount below zero
    #[error("Negative payment recorded for {participant}: {amount}")]
    NegativePayment {
        participant: String,
        amount: Decimal,
    },

    /// Single-payer mode names someone who is not on the bill
    #[error("Unknown payer: {0}")]
    UnknownPayer(String),

    /// Settlement configuration is unusable
    #[error("Invalid settlement configuration: {0}")]
    InvalidConfiguration(String),

    /// Money arithmetic failed, usually a currency mismatch
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
