//! Settlement Domain - Net Balances and Transfers
//!
//! This crate takes what each participant owes and what they actually paid,
//! and works out who should pay whom.
//!
//! # Key Concepts
//!
//! - **Payment record**: non-negative amount actually paid, per participant
//! - **Net balance**: paid minus owed; positive is a creditor, negative a debtor
//! - **Transfer**: one payment from a debtor to a creditor
//! - **Payment status**: total paid against total cost; a mismatch is
//!   reported, never turned into a transfer
//!
//! # Matching
//!
//! Balances within [`EPSILON`](core_kernel::EPSILON) of zero are settled and
//! take no part in matching. The default strategy sorts debtors and
//! creditors by amount and pairs them greedily; it needs at most
//! `debtors + creditors - 1` transfers. [`SettlementStrategy::MinimalTransfers`]
//! finds the fewest possible transfers for small balanced groups.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::{Currency, Money};
//! use domain_bill::{Bill, Item};
//! use domain_settlement::{compute_split, PayerMode, SettlementConfig};
//! use rust_decimal_macros::dec;
//!
//! let mut bill = Bill::new(Currency::USD);
//! let a = bill.add_participant("A").unwrap();
//! bill.add_participant("B").unwrap();
//! let item = Item::equal_split("Dinner", Money::new(dec!(50), Currency::USD), bill.roster().iter()).unwrap();
//! bill.add_item(item).unwrap();
//!
//! let outcome = compute_split(&bill, &PayerMode::single(a), SettlementConfig::default()).unwrap();
//! let transfers = &outcome.report().unwrap().settlement.transfers;
//! assert_eq!(transfers[0].amount.amount(), dec!(25));
//! ```

pub mod payment;
pub mod balance;
pub mod matching;
pub mod engine;
pub mod split;
pub mod error;

pub use payment::{PayerMode, PaymentRecord};
pub use balance::{Classification, NetBalance, Position, Standing};
pub use matching::{greedy_match, minimal_match, Transfer, MAX_EXACT_PARTICIPANTS};
pub use engine::{
    settle, PaymentStatus, Settlement, SettlementConfig, SettlementEngine, SettlementStrategy,
};
pub use split::{
    compute_split, compute_split_parts, NoResultReason, RankedShare, SplitOutcome, SplitReport,
};
pub use error::SettlementError;
