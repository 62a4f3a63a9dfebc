//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than standard assertions.

use core_kernel::{Money, EPSILON};
use domain_bill::CostShare;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that an amount is within [`EPSILON`] of `expected`
pub fn assert_amount_settles(actual: Decimal, expected: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= EPSILON,
        "Amounts differ by more than {}: actual={}, expected={}",
        EPSILON,
        actual,
        expected
    );
}

/// Asserts that a participant owes exactly `expected`
pub fn assert_owes(shares: &CostShare, name: &str, expected: Decimal) {
    let owed = shares.owed(name).amount();
    assert_eq!(
        owed, expected,
        "{} owes {}, expected {}",
        name, owed, expected
    );
}

/// Asserts that the shares add up to `total` within [`EPSILON`]
pub fn assert_shares_conserve(shares: &CostShare, total: &Money) {
    let sum = shares.total().expect("shares must not overflow");
    assert_eq!(sum.currency(), total.currency(), "Currency mismatch");
    let diff = (sum.amount() - total.amount()).abs();
    assert!(
        diff <= EPSILON,
        "Shares sum to {} but total is {} (diff {})",
        sum.amount(),
        total.amount(),
        diff
    );
}
