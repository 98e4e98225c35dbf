//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod typst_report;
#[cfg(feature = "web")]
pub mod web;
