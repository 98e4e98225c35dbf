//! Data access port trait.

use crate::domain::error::DashboardError;
use crate::domain::transaction::Transaction;

/// Source of the transaction table. Implementations load the whole table
/// once; the pipeline never writes back.
pub trait TransactionSource {
    fn load_transactions(&self) -> Result<Vec<Transaction>, DashboardError>;

    /// Human-readable origin used in log lines.
    fn describe(&self) -> String;
}
