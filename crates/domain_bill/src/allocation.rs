//! Weighted cost allocation
//!
//! Each item's price is divided by the total weight of its involvement
//! list, and every involved participant is charged `price / total_weight *
//! weight`. Amounts are accumulated as raw decimals across all items and
//! only rounded to internal money precision once, at the end.
//!
//! Invalid items are skipped rather than aborting the whole calculation, so
//! one bad record never blocks the result for everyone else. References to
//! participants outside the given set are ignored; that portion of the item
//! is simply not charged to anybody.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use core_kernel::{Currency, ItemId, Money, MoneyError};
use crate::error::InvalidItemReason;
use crate::item::Item;
use crate::participant::ParticipantName;

/// What each participant owes, derived from the item list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostShare {
    currency: Currency,
    shares: BTreeMap<ParticipantName, Money>,
}

impl CostShare {
    /// Creates an empty share map
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            shares: BTreeMap::new(),
        }
    }

    /// Builds a share map from explicit amounts
    ///
    /// Amounts in another currency are rejected.
    pub fn from_amounts<I>(currency: Currency, amounts: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = (ParticipantName, Money)>,
    {
        let mut share = Self::new(currency);
        for (name, amount) in amounts {
            if amount.currency() != currency {
                return Err(MoneyError::CurrencyMismatch(
                    currency.to_string(),
                    amount.currency().to_string(),
                ));
            }
            share.shares.insert(name, amount);
        }
        Ok(share)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount owed by `name`, or zero if they owe nothing
    pub fn owed(&self, name: &str) -> Money {
        self.shares
            .get(name)
            .copied()
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    pub fn get(&self, name: &str) -> Option<&Money> {
        self.shares.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shares.contains_key(name)
    }

    /// Iterates in name order
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantName, &Money)> {
        self.shares.iter()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares
    pub fn total(&self) -> Result<Money, MoneyError> {
        Money::checked_sum(self.shares.values(), self.currency)
    }

    /// Shares ordered for display: largest amount first, ties by name
    pub fn ranked(&self) -> Vec<(&ParticipantName, Money)> {
        let mut ranked: Vec<_> = self.shares.iter().map(|(n, m)| (n, *m)).collect();
        ranked.sort_by(|a, b| b.1.amount().cmp(&a.1.amount()).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// An item the allocator left out, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub item_id: ItemId,
    pub item_name: String,
    pub reason: InvalidItemReason,
}

/// Result of one allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Sum of the prices of all allocated items
    pub total: Money,
    /// Per-participant owed amounts
    pub shares: CostShare,
    /// Items excluded from the calculation
    pub skipped_items: Vec<SkippedItem>,
}

/// Derives each participant's owed share from the item list
///
/// # Arguments
///
/// * `participants` - The current participant set; everyone starts at zero
/// * `items` - The items to split
/// * `currency` - The bill currency; items priced otherwise are skipped
///
/// # Returns
///
/// The bill total, the per-participant shares, and any skipped items
///
/// # Example
///
/// ```rust
/// use core_kernel::{Currency, Money};
/// use domain_bill::{allocate_costs, Item, Roster};
/// use rust_decimal_macros::dec;
///
/// let roster = Roster::from_names(["A", "B", "C"]).unwrap();
/// let item = Item::equal_split("Dinner", Money::new(dec!(90), Currency::USD), roster.iter()).unwrap();
///
/// let allocation = allocate_costs(roster.as_slice(), &[item], Currency::USD);
/// assert_eq!(allocation.shares.owed("A").amount(), dec!(30));
/// ```
pub fn allocate_costs(
    participants: &[ParticipantName],
    items: &[Item],
    currency: Currency,
) -> Allocation {
    let mut owed: BTreeMap<ParticipantName, Decimal> = participants
        .iter()
        .map(|p| (p.clone(), Decimal::ZERO))
        .collect();
    let mut total = Decimal::ZERO;
    let mut skipped_items = Vec::new();

    for item in items {
        let charged = check_item(item, currency).and_then(|()| charge_item(item, &owed, total));
        let (new_total, charges) = match charged {
            Ok(charged) => charged,
            Err(reason) => {
                warn!(item_id = %item.id, item = %item.name, %reason, "Skipping invalid item");
                skipped_items.push(SkippedItem {
                    item_id: item.id,
                    item_name: item.name.clone(),
                    reason,
                });
                continue;
            }
        };

        total = new_total;
        owed.extend(charges);
    }

    let shares = CostShare {
        currency,
        shares: owed
            .into_iter()
            .map(|(name, amount)| (name, Money::new(amount, currency)))
            .collect(),
    };

    Allocation {
        total: Money::new(total, currency),
        shares,
        skipped_items,
    }
}

/// Running total and updated owed amounts after adding `item`
///
/// Nothing is applied unless every step fits in a `Decimal`.
fn charge_item(
    item: &Item,
    owed: &BTreeMap<ParticipantName, Decimal>,
    total: Decimal,
) -> Result<(Decimal, BTreeMap<ParticipantName, Decimal>), InvalidItemReason> {
    let price = item.price.amount();
    let new_total = total.checked_add(price).ok_or(InvalidItemReason::Overflow)?;
    let per_weight = price
        .checked_div(item.total_weight()?)
        .ok_or(InvalidItemReason::Overflow)?;

    let mut charges: BTreeMap<ParticipantName, Decimal> = BTreeMap::new();
    for entry in &item.involved {
        let current = match charges.get(entry.participant.as_str()) {
            Some(staged) => *staged,
            None => match owed.get(entry.participant.as_str()) {
                Some(amount) => *amount,
                None => {
                    debug!(
                        item = %item.name,
                        participant = %entry.participant,
                        "Ignoring stale participant reference"
                    );
                    continue;
                }
            },
        };
        let charge = per_weight
            .checked_mul(entry.weight.value())
            .ok_or(InvalidItemReason::Overflow)?;
        let amount = current.checked_add(charge).ok_or(InvalidItemReason::Overflow)?;
        charges.insert(entry.participant.clone(), amount);
    }

    Ok((new_total, charges))
}

fn check_item(item: &Item, currency: Currency) -> Result<(), InvalidItemReason> {
    if item.price.currency() != currency {
        return Err(InvalidItemReason::CurrencyMismatch {
            expected: currency.to_string(),
            found: item.price.currency().to_string(),
        });
    }
    item.check_allocatable()
}
