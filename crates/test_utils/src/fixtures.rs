//! Pre-built Test Fixtures
//!
//! Ready-to-use bills for the scenarios the test suite keeps coming back to.
//! Fixed fixtures use single-letter names so assertions stay short.

use std::collections::BTreeSet;

use core_kernel::{Currency, Money};
use domain_bill::{Bill, Involvement, Item, ParticipantName, Weight};
use fake::faker::name::en::FirstName;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// USD amount
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// EUR amount for currency mismatch tests
    pub fn eur(amount: Decimal) -> Money {
        Money::new(amount, Currency::EUR)
    }
}

/// Fixture for participant names
pub struct NameFixtures;

impl NameFixtures {
    /// Parses a name known to be valid
    pub fn name(s: &str) -> ParticipantName {
        ParticipantName::new(s).expect("fixture name must not be blank")
    }

    /// Parses several names known to be valid
    pub fn names(names: &[&str]) -> Vec<ParticipantName> {
        names.iter().map(|n| Self::name(n)).collect()
    }

    /// `count` distinct realistic first names
    pub fn random_names(count: usize) -> Vec<ParticipantName> {
        let mut seen = BTreeSet::new();
        let mut names = Vec::with_capacity(count);
        while names.len() < count {
            let candidate: String = FirstName().fake();
            // Small pool; disambiguate repeats with a counter
            let candidate = if seen.contains(&candidate) {
                format!("{candidate} {}", names.len())
            } else {
                candidate
            };
            if seen.insert(candidate.clone()) {
                names.push(Self::name(&candidate));
            }
        }
        names
    }
}

/// Fixture for whole bills
pub struct BillFixtures;

impl BillFixtures {
    /// Empty USD bill with the given participants
    pub fn with_participants(names: &[&str]) -> Bill {
        let mut bill = Bill::new(Currency::USD);
        for name in names {
            bill.add_participant(name).expect("fixture participants must be unique");
        }
        bill
    }

    /// A, B and C share one 90.00 item equally
    pub fn dinner_for_three() -> Bill {
        let mut bill = Self::with_participants(&["A", "B", "C"]);
        let item = Item::equal_split("Dinner", MoneyFixtures::usd(dec!(90.00)), bill.roster().iter())
            .expect("fixture item must be valid");
        bill.add_item(item).expect("fixture item must fit the bill");
        bill
    }

    /// A (weight 1) and B (weight 3) share one 100.00 item
    pub fn weighted_pair() -> Bill {
        let mut bill = Self::with_participants(&["A", "B"]);
        let item = Item::new(
            "Taxi",
            MoneyFixtures::usd(dec!(100.00)),
            vec![
                Involvement::new(NameFixtures::name("A")),
                Involvement::weighted(
                    NameFixtures::name("B"),
                    Weight::new(dec!(3)).expect("fixture weight must be positive"),
                ),
            ],
        )
        .expect("fixture item must be valid");
        bill.add_item(item).expect("fixture item must fit the bill");
        bill
    }

    /// A and B share one 50.00 item equally
    pub fn lunch_for_two() -> Bill {
        let mut bill = Self::with_participants(&["A", "B"]);
        let item = Item::equal_split("Lunch", MoneyFixtures::usd(dec!(50.00)), bill.roster().iter())
            .expect("fixture item must be valid");
        bill.add_item(item).expect("fixture item must fit the bill");
        bill
    }

    /// A, B and C share one 60.00 item equally
    pub fn pizza_for_three() -> Bill {
        let mut bill = Self::with_participants(&["A", "B", "C"]);
        let item = Item::equal_split("Pizza", MoneyFixtures::usd(dec!(60.00)), bill.roster().iter())
            .expect("fixture item must be valid");
        bill.add_item(item).expect("fixture item must fit the bill");
        bill
    }
}
