//! Test Data Builders
//!
//! Builder patterns for constructing bills and items with sensible defaults.
//! Tests specify only the fields they care about.

use core_kernel::{Currency, Money};
use domain_bill::{Bill, Involvement, Item, ParticipantName, Weight};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::NameFixtures;

/// Builder for a single item
pub struct ItemBuilder {
    name: String,
    price: Money,
    involved: Vec<Involvement>,
}

impl ItemBuilder {
    /// Starts an item priced 10.00 USD, shared by nobody yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Money::new(dec!(10.00), Currency::USD),
            involved: Vec::new(),
        }
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    /// Sets a USD price
    pub fn usd(mut self, amount: Decimal) -> Self {
        self.price = Money::new(amount, Currency::USD);
        self
    }

    /// Adds a participant with the default weight
    pub fn shared_by(mut self, name: &str) -> Self {
        self.involved.push(Involvement::new(NameFixtures::name(name)));
        self
    }

    /// Adds a participant with an explicit weight
    pub fn weighted(mut self, name: &str, weight: Decimal) -> Self {
        let weight = Weight::new(weight).expect("builder weight must be positive");
        self.involved
            .push(Involvement::weighted(NameFixtures::name(name), weight));
        self
    }

    /// Builds the item, enforcing the usual entry-time checks
    pub fn build(self) -> Item {
        Item::new(self.name, self.price, self.involved).expect("builder item must be valid")
    }
}

/// Builder for a whole bill
pub struct BillBuilder {
    currency: Currency,
    participants: Vec<ParticipantName>,
    items: Vec<Item>,
}

impl Default for BillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillBuilder {
    /// Starts an empty USD bill
    pub fn new() -> Self {
        Self {
            currency: Currency::USD,
            participants: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn participant(mut self, name: &str) -> Self {
        self.participants.push(NameFixtures::name(name));
        self
    }

    pub fn participants(mut self, names: &[&str]) -> Self {
        self.participants.extend(NameFixtures::names(names));
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Adds an item split equally among everyone added so far
    pub fn equal_item(mut self, name: &str, amount: Decimal) -> Self {
        let item = Item::equal_split(
            name,
            Money::new(amount, self.currency),
            &self.participants,
        )
        .expect("builder item must be valid");
        self.items.push(item);
        self
    }

    pub fn build(self) -> Bill {
        let mut bill = Bill::new(self.currency);
        for name in self.participants {
            bill.add_participant(name.as_str())
                .expect("builder participants must be unique");
        }
        for item in self.items {
            bill.add_item(item).expect("builder item must fit the bill");
        }
        bill
    }
}
