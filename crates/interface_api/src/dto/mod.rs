//! Request and response DTOs

pub mod splits;
