//! Property-Based Test Generators
//!
//! Proptest strategies that produce bills which satisfy the entry-time
//! invariants: positive prices and weights, non-empty involvement lists, and
//! participants drawn from the roster.

use core_kernel::{Currency, Money};
use domain_bill::{Bill, Involvement, Item, ParticipantName, Weight};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::NameFixtures;

/// Strategy for positive prices in minor units (0.01 to 5,000.00)
pub fn price_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..500_000i64
}

/// Strategy for USD prices
pub fn usd_price_strategy() -> impl Strategy<Value = Money> {
    price_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::USD))
}

/// Strategy for non-negative USD payments, zero included
pub fn usd_payment_strategy() -> impl Strategy<Value = Money> {
    (0i64..500_000i64).prop_map(|minor| Money::from_minor(minor, Currency::USD))
}

/// Strategy for weights from 0.5 to 4.0 in steps of 0.5
pub fn weight_strategy() -> impl Strategy<Value = Weight> {
    (1i64..=8i64).prop_map(|halves| {
        Weight::new(Decimal::new(halves * 5, 1)).expect("generated weight is positive")
    })
}

/// Strategy for `min..=max` distinct participant names (`P0`, `P1`, ...)
pub fn participant_names_strategy(
    min: usize,
    max: usize,
) -> impl Strategy<Value = Vec<ParticipantName>> {
    (min.max(1)..=max.max(1)).prop_map(|count| {
        (0..count)
            .map(|i| NameFixtures::name(&format!("P{i}")))
            .collect()
    })
}

/// Strategy for an item shared by a non-empty weighted subset of `names`
///
/// `names` must not be empty.
pub fn item_strategy(names: Vec<ParticipantName>) -> impl Strategy<Value = Item> {
    let count = names.len();
    (
        price_minor_strategy(),
        proptest::collection::vec((any::<bool>(), weight_strategy()), count),
        0..count,
    )
        .prop_map(move |(minor, picks, fallback)| {
            let mut involved: Vec<Involvement> = names
                .iter()
                .zip(&picks)
                .filter(|(_, (picked, _))| *picked)
                .map(|(name, (_, weight))| Involvement::weighted(name.clone(), *weight))
                .collect();
            if involved.is_empty() {
                involved.push(Involvement::weighted(names[fallback].clone(), picks[fallback].1));
            }
            Item::new("Item", Money::from_minor(minor, Currency::USD), involved)
                .expect("generated item is valid")
        })
}

/// Strategy for a consistent USD bill with up to `max_participants` people
/// and between one and `max_items` items
pub fn bill_strategy(max_participants: usize, max_items: usize) -> impl Strategy<Value = Bill> {
    participant_names_strategy(1, max_participants).prop_flat_map(move |names| {
        let roster = names.clone();
        proptest::collection::vec(item_strategy(names), 1..=max_items.max(1)).prop_map(
            move |items| {
                let mut bill = Bill::new(Currency::USD);
                for name in &roster {
                    bill.add_participant(name.as_str())
                        .expect("generated names are distinct");
                }
                for item in items {
                    bill.add_item(item).expect("generated item fits the bill");
                }
                bill
            },
        )
    })
}
