//! Core Kernel - Foundational types for the bill-splitting system
//!
//! This crate provides the building blocks shared by the allocation and
//! settlement domains:
//! - Money types with precise decimal arithmetic
//! - The cent-level tolerance used to decide when a balance is settled
//! - Strongly-typed identifiers for items and settlement runs

pub mod money;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError, EPSILON, INTERNAL_PRECISION};
pub use identifiers::{ItemId, SettlementId};
