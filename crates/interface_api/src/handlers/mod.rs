//! Request handlers

pub mod health;
pub mod splits;
