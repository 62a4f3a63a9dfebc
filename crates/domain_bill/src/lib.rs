//! Bill Domain - Participants, Items, and Cost Allocation
//!
//! This crate models a shared bill and derives what each participant owes.
//!
//! # Key Concepts
//!
//! - **Participant**: identified by a unique display name
//! - **Item**: a priced expense with an involvement list of weighted participants
//! - **Weight**: a positive multiplier; defaults to 1
//! - **Cost share**: what each participant owes once every item is split
//!
//! # Allocation
//!
//! ```text
//! owed[p] = Σ over items containing p of  price / total_weight * weight[p]
//! ```
//!
//! Allocation is a pure function of its inputs. Calling it twice with the
//! same snapshot gives the same result, so callers can simply recompute
//! after every edit.

pub mod participant;
pub mod item;
pub mod bill;
pub mod allocation;
pub mod validation;
pub mod error;

pub use participant::{ParticipantName, Roster};
pub use item::{Item, Involvement, Weight};
pub use bill::Bill;
pub use allocation::{allocate_costs, Allocation, CostShare, SkippedItem};
pub use validation::{BillValidator, ValidationResult};
pub use error::{BillError, InvalidItemReason};
