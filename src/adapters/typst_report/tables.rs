//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Sales share tables (category, segment)
//! - Segment → category → sub-category breakdown with subtotals
//! - Top customers and their profit per year
//! - Yearly and per-segment sales/quantity/profit summaries

use crate::domain::aggregation::{
    CustomerProfit, CustomerYearProfit, HierarchySales, SegmentTotals, YearlyTotals,
    rollup_categories,
};
use crate::domain::currency::format_currency;
use crate::domain::transaction::label;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Escape characters that carry markup meaning inside a Typst content block.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '$' | '#' | '*' | '_' | '@' | '<' | '>' | '[' | ']' | '`' | '~'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn cell(text: &str) -> String {
    format!("[{}]", escape(text))
}

fn money(value: f64) -> String {
    cell(&format_currency(value))
}

fn share(part: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.1}%", part / total * 100.0)
    } else {
        "-".to_string()
    }
}

/// Two-column-plus-share table for a `label → sales` view.
pub fn render_sales_share<'a>(
    heading: &str,
    rows: impl IntoIterator<Item = (&'a Option<String>, f64)>,
    total: f64,
) -> String {
    let rows: Vec<_> = rows.into_iter().collect();
    if rows.is_empty() {
        return "_No sales data._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, auto, auto),\n");
    output.push_str("  align: (left, right, right),\n");
    output.push_str(&format!("  [*{}*], [*Sales*], [*Share*],\n", escape(heading)));
    for (key, sales) in rows {
        output.push_str(&format!(
            "  {}, {}, [{}],\n",
            cell(label(key)),
            money(sales),
            share(sales, total)
        ));
    }
    output.push_str(&format!("  [*Total*], {}, [100.0%],\n", money(total)));
    output.push_str(")\n\n");
    output
}

/// Hierarchy table: each (segment, category) subtotal followed by its
/// sub-category leaves.
pub fn render_segment_hierarchy(leaves: &[HierarchySales]) -> String {
    if leaves.is_empty() {
        return "_No sales data._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, auto, auto, auto),\n");
    output.push_str("  align: (left, left, left, right),\n");
    output.push_str("  [*Segment*], [*Category*], [*Sub-Category*], [*Sales*],\n");

    for parent in rollup_categories(leaves) {
        output.push_str(&format!(
            "  {}, {}, [_all_], [*{}*],\n",
            cell(label(&parent.segment)),
            cell(label(&parent.category)),
            escape(&format_currency(parent.sales))
        ));
        for leaf in leaves
            .iter()
            .filter(|l| l.segment == parent.segment && l.category == parent.category)
        {
            output.push_str(&format!(
                "  [], [], {}, {},\n",
                cell(label(&leaf.sub_category)),
                money(leaf.sales)
            ));
        }
    }

    output.push_str(")\n\n");
    output
}

pub fn render_top_customers(customers: &[CustomerProfit]) -> String {
    if customers.is_empty() {
        return "_No customers._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, auto, auto),\n");
    output.push_str("  align: (right, left, right),\n");
    output.push_str("  [*Rank*], [*Customer*], [*Total Profit*],\n");
    for (rank, customer) in customers.iter().enumerate() {
        output.push_str(&format!(
            "  [{}], {}, {},\n",
            rank + 1,
            cell(label(&customer.customer)),
            money(customer.profit)
        ));
    }
    output.push_str(")\n\n");
    output
}

/// Customer × year pivot of the top-customer profit view. Years without
/// orders for a customer show a dash.
pub fn render_customer_profit_by_year(
    customers: &[CustomerProfit],
    rows: &[CustomerYearProfit],
    years: &[i32],
) -> String {
    if rows.is_empty() || years.is_empty() {
        return "_No customer profit data._\n\n".to_string();
    }

    let lookup: BTreeMap<(&Option<String>, i32), f64> = rows
        .iter()
        .map(|r| ((&r.customer, r.year), r.profit))
        .collect();

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str(&format!("  columns: {},\n", years.len() + 1));
    output.push_str("  [*Customer*],");
    for year in years {
        output.push_str(&format!(" [*{}*],", year));
    }
    output.push('\n');

    for customer in customers {
        output.push_str(&format!("  {},", cell(label(&customer.customer))));
        for &year in years {
            match lookup.get(&(&customer.customer, year)) {
                Some(&profit) => output.push_str(&format!(" {},", money(profit))),
                None => output.push_str(" [-],"),
            }
        }
        output.push('\n');
    }

    output.push_str(")\n\n");
    output
}

pub fn render_yearly_trends(rows: &[YearlyTotals]) -> String {
    if rows.is_empty() {
        return "_No yearly data._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, auto, auto, auto),\n");
    output.push_str("  align: (left, right, right, right),\n");
    output.push_str("  [*Year Ending*], [*Sales*], [*Quantity*], [*Profit*],\n");
    for row in rows {
        output.push_str(&format!(
            "  [{} ({})], {}, [{}], {},\n",
            row.year_end.format("%Y-%m-%d"),
            row.year_end.year(),
            money(row.sales),
            row.quantity,
            money(row.profit)
        ));
    }
    output.push_str(")\n\n");
    output
}

pub fn render_segment_summary(rows: &[SegmentTotals]) -> String {
    if rows.is_empty() {
        return "_No segment data._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, auto, auto, auto, auto),\n");
    output.push_str("  align: (left, right, right, right, right),\n");
    output.push_str("  [*Segment*], [*Sales*], [*Quantity*], [*Profit*], [*Margin*],\n");
    for row in rows {
        let margin = if row.sales > 0.0 {
            format!("{:.1}%", row.profit / row.sales * 100.0)
        } else {
            "-".to_string()
        };
        output.push_str(&format!(
            "  {}, {}, [{}], {}, [{}],\n",
            cell(label(&row.segment)),
            money(row.sales),
            row.quantity,
            money(row.profit),
            margin
        ));
    }
    output.push_str(")\n\n");
    output
}
