//! Bill domain errors

use core_kernel::MoneyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an item cannot take part in cost allocation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidItemReason {
    #[error("item name is blank")]
    BlankName,

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("item is not shared by anyone")]
    NoParticipants,

    #[error("total weight must be positive, got {0}")]
    NonPositiveTotalWeight(Decimal),

    #[error("participant listed more than once: {0}")]
    DuplicateParticipant(String),

    #[error("price is in {found}, bill is in {expected}")]
    CurrencyMismatch { expected: String, found: String },

    #[error("amounts are too large to split")]
    Overflow,
}

/// Errors that can occur in the bill domain
#[derive(Debug, Error)]
pub enum BillError {
    /// Participant name is blank after trimming
    #[error("Invalid participant name: {0:?}")]
    InvalidParticipantName(String),

    /// Participant already on the roster
    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    /// Participant not on the roster
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// Item shares its cost with somebody who is not on the roster
    #[error("Item {item} references unknown participant {participant}")]
    UnknownParticipantReference { item: String, participant: String },

    /// Weight is zero or negative
    #[error("Invalid weight: {0} (weights must be positive)")]
    InvalidWeight(Decimal),

    /// Item fails construction-time checks
    #[error("Invalid item {item}: {reason}")]
    InvalidItem {
        item: String,
        reason: InvalidItemReason,
    },

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Money arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl BillError {
    pub fn invalid_item(item: impl Into<String>, reason: InvalidItemReason) -> Self {
        BillError::InvalidItem {
            item: item.into(),
            reason,
        }
    }
}
