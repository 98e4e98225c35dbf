//! Transaction record: one row of the source sales table.

use chrono::NaiveDate;

/// Label shown wherever a missing text value forms its own group.
pub const MISSING_LABEL: &str = "(missing)";

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub order_date: NaiveDate,
    pub customer_name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub segment: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub sales: f64,
    pub quantity: i64,
    pub profit: f64,
}

/// Render an optional grouping key for display.
pub fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING_LABEL)
}

/// Earliest and latest order date in the table, or `None` when empty.
pub fn date_range(transactions: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let min = transactions.iter().map(|t| t.order_date).min()?;
    let max = transactions.iter().map(|t| t.order_date).max()?;
    Some((min, max))
}
