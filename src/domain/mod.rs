//! Core domain types and logic.

pub mod aggregation;
pub mod currency;
pub mod error;
pub mod product_table;
pub mod transaction;
