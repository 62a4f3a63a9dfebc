//! Bill consistency checks
//!
//! The allocator tolerates bad data by skipping it. This module reports the
//! same problems up front so a caller can show them while the bill is being
//! edited.
//!
//! # Validation Rules
//!
//! ## Errors
//! - Item name must not be blank
//! - Item price must be positive and in the bill currency
//! - Item must be shared by at least one participant, each listed once
//!
//! ## Warnings
//! - Item references a participant who is no longer on the bill
//! - Item is shared only by participants who are no longer on the bill
//! - Bill has items but nobody to split them between

use core_kernel::Currency;
use crate::bill::Bill;
use crate::error::{BillError, InvalidItemReason};
use crate::item::Item;
use crate::participant::Roster;

/// Result of bill validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether every item can be allocated
    pub is_valid: bool,
    /// Problems that make an item unusable
    pub errors: Vec<String>,
    /// Inconsistencies the allocator will silently work around
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for bills and raw item lists
pub struct BillValidator;

impl BillValidator {
    /// Validates a whole bill
    pub fn validate(bill: &Bill) -> ValidationResult {
        Self::validate_parts(bill.roster(), bill.items(), bill.currency())
    }

    /// Validates a roster and item list that have not been assembled into a `Bill`
    pub fn validate_parts(roster: &Roster, items: &[Item], currency: Currency) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if roster.is_empty() && !items.is_empty() {
            result.add_warning("Bill has items but no participants");
        }

        for item in items {
            result.merge(Self::validate_item(item, roster, currency));
        }

        result
    }

    /// Validates a single item against the roster
    pub fn validate_item(item: &Item, roster: &Roster, currency: Currency) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if let Err(err) = item.validate() {
            result.add_error(err.to_string());
        }

        if item.price.currency() != currency {
            let err = BillError::invalid_item(
                &item.name,
                InvalidItemReason::CurrencyMismatch {
                    expected: currency.to_string(),
                    found: item.price.currency().to_string(),
                },
            );
            result.add_error(err.to_string());
        }

        let stale: Vec<&str> = item
            .involved
            .iter()
            .map(|i| i.participant.as_str())
            .filter(|name| !roster.contains(name))
            .collect();

        if !stale.is_empty() {
            if stale.len() == item.involved.len() {
                result.add_warning(format!(
                    "Item {} is shared only by removed participants; its cost will not be charged to anyone",
                    item.name
                ));
            } else {
                result.add_warning(format!(
                    "Item {} references removed participants: {}",
                    item.name,
                    stale.join(", ")
                ));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::ParticipantName;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    fn name(s: &str) -> ParticipantName {
        ParticipantName::new(s).unwrap()
    }

    #[test]
    fn test_clean_bill_is_valid() {
        let mut bill = Bill::new(Currency::USD);
        bill.add_participant("A").unwrap();
        let item = Item::equal_split("Tea", Money::new(dec!(3), Currency::USD), bill.roster().iter())
            .unwrap();
        bill.add_item(item).unwrap();

        let result = BillValidator::validate(&bill);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_stale_reference_is_a_warning() {
        let roster = Roster::from_names(["A"]).unwrap();
        let item = Item::equal_split("Cab", Money::new(dec!(9), Currency::USD), &[name("A"), name("B")])
            .unwrap();

        let result = BillValidator::validate_parts(&roster, &[item], Currency::USD);

        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("B"));
    }

    #[test]
    fn test_invalid_price_is_an_error() {
        let roster = Roster::from_names(["A"]).unwrap();
        let mut item = Item::equal_split("Cab", Money::new(dec!(9), Currency::USD), roster.iter())
            .unwrap();
        item.price = Money::new(dec!(-1), Currency::USD);

        let result = BillValidator::validate_parts(&roster, &[item], Currency::USD);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }
}
