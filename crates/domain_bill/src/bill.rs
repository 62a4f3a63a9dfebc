//! The editable bill
//!
//! `Bill` is the caller-side collection that keeps the roster and the item
//! involvement lists consistent with each other. The allocator itself only
//! ever borrows a snapshot of it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Currency, ItemId, Money};
use crate::allocation::{allocate_costs, Allocation};
use crate::error::{BillError, InvalidItemReason};
use crate::item::Item;
use crate::participant::{ParticipantName, Roster};

/// A bill: who took part, and what they shared
///
/// # Invariants
///
/// - Every item added through `add_item` is priced in the bill currency
/// - Removing a participant removes them from every involvement list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    currency: Currency,
    roster: Roster,
    items: Vec<Item>,
}

impl Bill {
    /// Creates an empty bill in the given currency
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            roster: Roster::new(),
            items: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Adds a participant by display name
    ///
    /// # Errors
    ///
    /// - `InvalidParticipantName` if the name is blank
    /// - `DuplicateParticipant` if the name is already on the bill
    pub fn add_participant(&mut self, name: impl AsRef<str>) -> Result<ParticipantName, BillError> {
        let name = ParticipantName::new(name)?;
        self.roster.add(name.clone())?;
        Ok(name)
    }

    /// Removes a participant and drops them from every item they shared
    ///
    /// Items left with nobody sharing them stay on the bill; the allocator
    /// skips them until someone is added back.
    ///
    /// # Returns
    ///
    /// The number of items whose involvement list changed
    pub fn remove_participant(&mut self, name: &str) -> Result<usize, BillError> {
        let removed = self.roster.remove(name)?;

        let affected = self
            .items
            .iter_mut()
            .map(|item| item.remove_participant(removed.as_str()))
            .filter(|changed| *changed)
            .count();

        debug!(participant = %removed, items_affected = affected, "Participant removed");
        Ok(affected)
    }

    /// Adds an item to the bill
    ///
    /// # Errors
    ///
    /// - `InvalidItem` if the item fails entry-time checks or uses another currency
    /// - `UnknownParticipantReference` if it is shared with someone not on the bill
    pub fn add_item(&mut self, item: Item) -> Result<ItemId, BillError> {
        item.validate()?;

        if item.price.currency() != self.currency {
            return Err(BillError::invalid_item(
                &item.name,
                InvalidItemReason::CurrencyMismatch {
                    expected: self.currency.to_string(),
                    found: item.price.currency().to_string(),
                },
            ));
        }

        if let Some(stranger) = item
            .involved
            .iter()
            .find(|i| !self.roster.contains(i.participant.as_str()))
        {
            return Err(BillError::UnknownParticipantReference {
                item: item.name.clone(),
                participant: stranger.participant.to_string(),
            });
        }

        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    /// Removes an item by identifier
    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item, BillError> {
        let index = self
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| BillError::ItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Runs the cost allocator over the current snapshot
    pub fn allocate(&self) -> Allocation {
        allocate_costs(self.roster.as_slice(), &self.items, self.currency)
    }

    /// Sum of the prices of every allocatable item
    pub fn total(&self) -> Money {
        self.allocate().total
    }
}
