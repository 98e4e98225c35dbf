//! CSV file data adapter for the Superstore transaction export.

use crate::domain::error::DashboardError;
use crate::domain::transaction::Transaction;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::TransactionSource;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_CUSTOMER_NAME: &str = "Customer Name";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SUB_CATEGORY: &str = "Sub-Category";
pub const COL_SEGMENT: &str = "Segment";
pub const COL_PRODUCT_ID: &str = "Product ID";
pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_SALES: &str = "Sales";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_PROFIT: &str = "Profit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1,
    Utf8,
}

impl TextEncoding {
    fn decode(self, bytes: Vec<u8>) -> Result<String, DashboardError> {
        match self {
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            TextEncoding::Utf8 => {
                let text = String::from_utf8(bytes).map_err(|e| DashboardError::Csv {
                    reason: format!("file is not valid UTF-8: {}", e),
                })?;
                Ok(text
                    .strip_prefix('\u{feff}')
                    .map(str::to_string)
                    .unwrap_or(text))
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            other => Err(format!("unsupported encoding '{}' (expected latin1 or utf8)", other)),
        }
    }
}

/// Header positions of the columns the pipeline reads.
struct ColumnIndex {
    order_date: usize,
    customer_name: usize,
    category: usize,
    sub_category: usize,
    segment: usize,
    product_id: usize,
    product_name: usize,
    sales: usize,
    quantity: usize,
    profit: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DashboardError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DashboardError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            order_date: find(COL_ORDER_DATE)?,
            customer_name: find(COL_CUSTOMER_NAME)?,
            category: find(COL_CATEGORY)?,
            sub_category: find(COL_SUB_CATEGORY)?,
            segment: find(COL_SEGMENT)?,
            product_id: find(COL_PRODUCT_ID)?,
            product_name: find(COL_PRODUCT_NAME)?,
            sales: find(COL_SALES)?,
            quantity: find(COL_QUANTITY)?,
            profit: find(COL_PROFIT)?,
        })
    }
}

pub struct CsvAdapter {
    path: PathBuf,
    encoding: TextEncoding,
    date_format: String,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            encoding: TextEncoding::Latin1,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Build from the `[data]` section; `path_override` wins over `csv_path`.
    pub fn from_config(
        config: &dyn ConfigPort,
        path_override: Option<&Path>,
    ) -> Result<Self, DashboardError> {
        let path = match path_override {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(config.require_setting("data", "csv_path")?),
        };

        let encoding = match config.get_setting("data", "encoding") {
            Some(value) => value
                .parse()
                .map_err(|reason| DashboardError::ConfigInvalid {
                    section: "data".into(),
                    key: "encoding".into(),
                    reason,
                })?,
            None => TextEncoding::Latin1,
        };

        let date_format = config
            .get_setting("data", "date_format")
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());

        Ok(Self::new(path)
            .with_encoding(encoding)
            .with_date_format(date_format))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse already-decoded CSV text into transactions.
    pub fn parse(&self, content: &str) -> Result<Vec<Transaction>, DashboardError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DashboardError::Csv {
            reason: format!("failed to read header row: {}", e),
        })?;
        let columns = ColumnIndex::resolve(headers)?;

        let mut transactions = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DashboardError::Csv {
                reason: e.to_string(),
            })?;
            transactions.push(self.parse_record(&record, &columns)?);
        }

        Ok(transactions)
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnIndex,
    ) -> Result<Transaction, DashboardError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        // Text keys group by exact value, so only an empty field is missing.
        let text = |idx: usize| {
            let value = record.get(idx).unwrap_or("");
            (!value.is_empty()).then(|| value.to_string())
        };
        let invalid = |column: &str, value: &str, reason: String| DashboardError::InvalidField {
            line,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        };

        let raw_date = field(columns.order_date);
        let order_date = NaiveDate::parse_from_str(raw_date, &self.date_format)
            .map_err(|e| invalid(COL_ORDER_DATE, raw_date, e.to_string()))?;

        let raw_sales = field(columns.sales);
        let sales: f64 = raw_sales
            .parse()
            .map_err(|e: std::num::ParseFloatError| invalid(COL_SALES, raw_sales, e.to_string()))?;
        if !sales.is_finite() || sales < 0.0 {
            return Err(invalid(
                COL_SALES,
                raw_sales,
                "must be a non-negative amount".into(),
            ));
        }

        let raw_quantity = field(columns.quantity);
        let quantity: i64 = raw_quantity.parse().map_err(|e: std::num::ParseIntError| {
            invalid(COL_QUANTITY, raw_quantity, e.to_string())
        })?;
        if quantity < 0 {
            return Err(invalid(
                COL_QUANTITY,
                raw_quantity,
                "must be non-negative".into(),
            ));
        }

        let raw_profit = field(columns.profit);
        let profit: f64 = raw_profit.parse().map_err(|e: std::num::ParseFloatError| {
            invalid(COL_PROFIT, raw_profit, e.to_string())
        })?;
        if !profit.is_finite() {
            return Err(invalid(COL_PROFIT, raw_profit, "must be finite".into()));
        }

        Ok(Transaction {
            order_date,
            customer_name: text(columns.customer_name),
            category: text(columns.category),
            sub_category: text(columns.sub_category),
            segment: text(columns.segment),
            product_id: text(columns.product_id),
            product_name: text(columns.product_name),
            sales,
            quantity,
            profit,
        })
    }
}

impl TransactionSource for CsvAdapter {
    fn load_transactions(&self) -> Result<Vec<Transaction>, DashboardError> {
        let bytes = fs::read(&self.path).map_err(|e| {
            DashboardError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        let content = self.encoding.decode(bytes)?;
        let transactions = self.parse(&content)?;
        log::info!(
            "loaded {} transactions from {}",
            transactions.len(),
            self.path.display()
        );
        Ok(transactions)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
