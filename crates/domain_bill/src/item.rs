//! Shared expense items
//!
//! An item has a price and an involvement list naming who shares it and
//! with what weight. A participant with weight 3 pays three times as much
//! of the item as a participant with weight 1.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use core_kernel::{ItemId, Money};
use crate::error::{BillError, InvalidItemReason};
use crate::participant::ParticipantName;

/// A positive share multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Weight(Decimal);

impl Weight {
    /// Creates a weight
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeight` if `value` is zero or negative
    pub fn new(value: Decimal) -> Result<Self, BillError> {
        if value <= Decimal::ZERO {
            return Err(BillError::InvalidWeight(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self(Decimal::ONE)
    }
}

impl TryFrom<Decimal> for Weight {
    type Error = BillError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for Decimal {
    fn from(weight: Weight) -> Decimal {
        weight.0
    }
}

/// One entry of an item's involvement list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Involvement {
    pub participant: ParticipantName,
    #[serde(default)]
    pub weight: Weight,
}

impl Involvement {
    /// Involvement with the default weight of 1
    pub fn new(participant: ParticipantName) -> Self {
        Self {
            participant,
            weight: Weight::default(),
        }
    }

    pub fn weighted(participant: ParticipantName, weight: Weight) -> Self {
        Self { participant, weight }
    }
}

/// A shared expense item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, time-ordered by creation
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Full price of the item
    pub price: Money,
    /// Who shares the item, in the order they were selected
    pub involved: Vec<Involvement>,
}

impl Item {
    /// Creates an item, enforcing the entry-time checks
    ///
    /// # Arguments
    ///
    /// * `name` - Display name (trimmed, must not be blank)
    /// * `price` - Positive price
    /// * `involved` - Non-empty involvement list without repeated participants
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` describing the first failed check
    pub fn new(
        name: impl Into<String>,
        price: Money,
        involved: Vec<Involvement>,
    ) -> Result<Self, BillError> {
        let item = Self {
            id: ItemId::new(),
            name: name.into().trim().to_string(),
            price,
            involved,
        };
        item.validate()?;
        Ok(item)
    }

    /// Creates an item shared by everyone in `participants` with the default weight
    pub fn equal_split<'a, I>(
        name: impl Into<String>,
        price: Money,
        participants: I,
    ) -> Result<Self, BillError>
    where
        I: IntoIterator<Item = &'a ParticipantName>,
    {
        let involved = participants
            .into_iter()
            .cloned()
            .map(Involvement::new)
            .collect();
        Self::new(name, price, involved)
    }

    /// Full entry-time validation
    pub fn validate(&self) -> Result<(), BillError> {
        if self.name.trim().is_empty() {
            return Err(BillError::invalid_item(&self.name, InvalidItemReason::BlankName));
        }

        let mut seen = HashSet::new();
        for entry in &self.involved {
            if !seen.insert(entry.participant.as_str()) {
                return Err(BillError::invalid_item(
                    &self.name,
                    InvalidItemReason::DuplicateParticipant(entry.participant.to_string()),
                ));
            }
        }

        self.check_allocatable()
            .map_err(|reason| BillError::invalid_item(&self.name, reason))
    }

    /// The checks the allocator applies before splitting an item
    pub fn check_allocatable(&self) -> Result<(), InvalidItemReason> {
        if !self.price.is_positive() {
            return Err(InvalidItemReason::NonPositivePrice(self.price.amount()));
        }
        if self.involved.is_empty() {
            return Err(InvalidItemReason::NoParticipants);
        }
        let total = self.total_weight()?;
        if total <= Decimal::ZERO {
            return Err(InvalidItemReason::NonPositiveTotalWeight(total));
        }
        Ok(())
    }

    /// Sum of all weights in the involvement list
    pub fn total_weight(&self) -> Result<Decimal, InvalidItemReason> {
        self.involved
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.weight.value()))
            .ok_or(InvalidItemReason::Overflow)
    }

    pub fn involves(&self, name: &str) -> bool {
        self.involved.iter().any(|i| i.participant.as_str() == name)
    }

    /// Drops `name` from the involvement list; returns true if it was present
    pub fn remove_participant(&mut self, name: &str) -> bool {
        let before = self.involved.len();
        self.involved.retain(|i| i.participant.as_str() != name);
        before != self.involved.len()
    }

    /// Splits the price among the involved participants, exact to the cent
    ///
    /// Unlike the allocator, which keeps sub-cent precision across items,
    /// this gives the per-item breakdown a person would actually pay.
    pub fn cent_split(&self) -> Result<Vec<(ParticipantName, Money)>, BillError> {
        self.check_allocatable()
            .map_err(|reason| BillError::invalid_item(&self.name, reason))?;

        let weights: Vec<Decimal> = self.involved.iter().map(|i| i.weight.value()).collect();
        let parts = self.price.allocate_by_weights(&weights)?;

        Ok(self
            .involved
            .iter()
            .map(|i| i.participant.clone())
            .zip(parts)
            .collect())
    }
}
