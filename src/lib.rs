//! Retail sales dashboard backend.
//!
//! Hexagonal architecture: the aggregation pipeline and its types live in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
