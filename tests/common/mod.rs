#![allow(dead_code)]

use chrono::NaiveDate;
pub use superstore_dash::domain::transaction::Transaction;
use std::io::Write;

pub const CSV_HEADER: &str = "Row ID,Order ID,Order Date,Ship Date,Ship Mode,Customer ID,Customer Name,Segment,Country,City,State,Postal Code,Region,Product ID,Category,Sub-Category,Product Name,Sales,Quantity,Discount,Profit";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_transaction(
    customer: &str,
    segment: &str,
    category: &str,
    sub_category: &str,
    order_date: NaiveDate,
    sales: f64,
    quantity: i64,
    profit: f64,
) -> Transaction {
    Transaction {
        order_date,
        customer_name: Some(customer.to_string()),
        category: Some(category.to_string()),
        sub_category: Some(sub_category.to_string()),
        segment: Some(segment.to_string()),
        product_id: Some(format!("{}-{}", &category[..3.min(category.len())].to_uppercase(), sub_category)),
        product_name: Some(format!("{} item", sub_category)),
        sales,
        quantity,
        profit,
    }
}

/// A small table shaped like the Superstore sample: three segments, three
/// categories, seven customers across 2014–2017.
pub fn sample_table() -> Vec<Transaction> {
    vec![
        make_transaction("Claire Gute", "Consumer", "Furniture", "Bookcases", date(2016, 11, 8), 261.96, 2, 41.9136),
        make_transaction("Claire Gute", "Consumer", "Furniture", "Chairs", date(2016, 11, 8), 731.94, 3, 219.582),
        make_transaction("Darrin Van Huff", "Corporate", "Office Supplies", "Labels", date(2016, 6, 12), 14.62, 2, 6.8714),
        make_transaction("Sean O'Donnell", "Consumer", "Furniture", "Tables", date(2015, 10, 11), 957.5775, 5, -383.031),
        make_transaction("Sean O'Donnell", "Consumer", "Office Supplies", "Storage", date(2015, 10, 11), 22.368, 2, 2.5164),
        make_transaction("Brosina Hoffman", "Consumer", "Furniture", "Furnishings", date(2014, 6, 9), 48.86, 7, 14.1694),
        make_transaction("Brosina Hoffman", "Consumer", "Technology", "Phones", date(2014, 6, 9), 907.152, 6, 90.7152),
        make_transaction("Andrew Allen", "Consumer", "Office Supplies", "Paper", date(2017, 4, 15), 15.552, 3, 5.4432),
        make_transaction("Irene Maddox", "Consumer", "Technology", "Phones", date(2016, 12, 5), 407.976, 3, 132.5922),
        make_transaction("Harold Pawlan", "Home Office", "Office Supplies", "Binders", date(2015, 11, 22), 22.72, 4, 7.384),
        make_transaction("Harold Pawlan", "Home Office", "Technology", "Accessories", date(2017, 11, 22), 114.9, 5, 34.47),
        make_transaction("Pete Kriz", "Consumer", "Office Supplies", "Binders", date(2014, 9, 17), 1706.184, 9, 85.3092),
    ]
}

fn csv_field(value: &Option<String>) -> String {
    match value {
        Some(v) if v.contains(',') || v.contains('"') => format!("\"{}\"", v.replace('"', "\"\"")),
        Some(v) => v.clone(),
        None => String::new(),
    }
}

/// Serialise transactions in the Superstore export layout.
pub fn to_csv(rows: &[Transaction]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for (i, t) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{},CA-{},{},{},Standard Class,C-{},{},{},United States,Henderson,Kentucky,42420,South,{},{},{},{},{},{},0,{}\n",
            i + 1,
            i + 1,
            t.order_date.format("%-m/%-d/%Y"),
            t.order_date.format("%-m/%-d/%Y"),
            i + 1,
            csv_field(&t.customer_name),
            csv_field(&t.segment),
            csv_field(&t.product_id),
            csv_field(&t.category),
            csv_field(&t.sub_category),
            csv_field(&t.product_name),
            t.sales,
            t.quantity,
            t.profit,
        ));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
