//! Aggregation pipeline: the six derived views behind the dashboard.
//!
//! Every view is a pure function of the transaction table. Grouped views
//! emit one row per distinct key combination, ordered ascending by key.
//! A missing key value forms its own group and sorts before every present
//! value.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use super::currency::format_currency;
use super::transaction::Transaction;

/// Number of customers kept by the top-customer profit view.
pub const TOP_CUSTOMER_COUNT: usize = 5;

/// Grouping key for a text column; `None` is the missing-value group.
pub type Key = Option<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySales {
    pub category: Key,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSales {
    pub segment: Key,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentCategorySales {
    pub segment: Key,
    pub category: Key,
    pub sales: f64,
}

/// Leaf of the segment → category → sub-category hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchySales {
    pub segment: Key,
    pub category: Key,
    pub sub_category: Key,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfit {
    pub customer: Key,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerYearProfit {
    pub customer: Key,
    pub year: i32,
    pub profit: f64,
}

/// Calendar-year bucket labelled with its year-end date.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTotals {
    pub year_end: NaiveDate,
    pub sales: f64,
    pub quantity: i64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTotals {
    pub segment: Key,
    pub sales: f64,
    pub quantity: i64,
    pub profit: f64,
}

pub fn category_sales(transactions: &[Transaction]) -> Vec<CategorySales> {
    let mut groups: BTreeMap<&Key, f64> = BTreeMap::new();
    for t in transactions {
        *groups.entry(&t.category).or_default() += t.sales;
    }
    groups
        .into_iter()
        .map(|(category, sales)| CategorySales {
            category: category.clone(),
            sales,
        })
        .collect()
}

pub fn segment_sales(transactions: &[Transaction]) -> Vec<SegmentSales> {
    let mut groups: BTreeMap<&Key, f64> = BTreeMap::new();
    for t in transactions {
        *groups.entry(&t.segment).or_default() += t.sales;
    }
    groups
        .into_iter()
        .map(|(segment, sales)| SegmentSales {
            segment: segment.clone(),
            sales,
        })
        .collect()
}

pub fn segment_category_subcategory_sales(transactions: &[Transaction]) -> Vec<HierarchySales> {
    let mut groups: BTreeMap<(&Key, &Key, &Key), f64> = BTreeMap::new();
    for t in transactions {
        *groups
            .entry((&t.segment, &t.category, &t.sub_category))
            .or_default() += t.sales;
    }
    groups
        .into_iter()
        .map(|((segment, category, sub_category), sales)| HierarchySales {
            segment: segment.clone(),
            category: category.clone(),
            sub_category: sub_category.clone(),
            sales,
        })
        .collect()
}

/// Collapse hierarchy leaves to their (segment, category) parents.
pub fn rollup_categories(leaves: &[HierarchySales]) -> Vec<SegmentCategorySales> {
    let mut groups: BTreeMap<(&Key, &Key), f64> = BTreeMap::new();
    for leaf in leaves {
        *groups.entry((&leaf.segment, &leaf.category)).or_default() += leaf.sales;
    }
    groups
        .into_iter()
        .map(|((segment, category), sales)| SegmentCategorySales {
            segment: segment.clone(),
            category: category.clone(),
            sales,
        })
        .collect()
}

/// Collapse hierarchy leaves to the segment ring.
pub fn rollup_segments(leaves: &[HierarchySales]) -> Vec<SegmentSales> {
    let mut groups: BTreeMap<&Key, f64> = BTreeMap::new();
    for leaf in leaves {
        *groups.entry(&leaf.segment).or_default() += leaf.sales;
    }
    groups
        .into_iter()
        .map(|(segment, sales)| SegmentSales {
            segment: segment.clone(),
            sales,
        })
        .collect()
}

/// The `n` customers with the largest all-time profit, best first.
///
/// Profit is first summed per (customer, order date) and then per customer.
/// Candidates are ranked from the name-ordered customer table with a stable
/// sort, so equal profits keep name order.
pub fn top_customers_by_profit(transactions: &[Transaction], n: usize) -> Vec<CustomerProfit> {
    let mut daily: BTreeMap<(&Key, NaiveDate), f64> = BTreeMap::new();
    for t in transactions {
        *daily.entry((&t.customer_name, t.order_date)).or_default() += t.profit;
    }

    let mut per_customer: BTreeMap<&Key, f64> = BTreeMap::new();
    for ((customer, _), profit) in daily {
        *per_customer.entry(customer).or_default() += profit;
    }

    let mut ranked: Vec<CustomerProfit> = per_customer
        .into_iter()
        .map(|(customer, profit)| CustomerProfit {
            customer: customer.clone(),
            profit,
        })
        .collect();
    ranked.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    ranked.truncate(n);
    ranked
}

/// Yearly profit for the top [`TOP_CUSTOMER_COUNT`] customers. Years in
/// which a customer has no transactions are absent.
pub fn top_customer_profit_by_year(transactions: &[Transaction]) -> Vec<CustomerYearProfit> {
    let top: BTreeSet<Key> = top_customers_by_profit(transactions, TOP_CUSTOMER_COUNT)
        .into_iter()
        .map(|c| c.customer)
        .collect();

    let mut groups: BTreeMap<(&Key, i32), f64> = BTreeMap::new();
    for t in transactions.iter().filter(|t| top.contains(&t.customer_name)) {
        *groups
            .entry((&t.customer_name, t.order_date.year()))
            .or_default() += t.profit;
    }
    groups
        .into_iter()
        .map(|((customer, year), profit)| CustomerYearProfit {
            customer: customer.clone(),
            year,
            profit,
        })
        .collect()
}

/// Sales, quantity and profit per calendar year. Buckets cover every year
/// from the first to the last order; years without orders sum to zero.
pub fn yearly_sales_quantity_profit(transactions: &[Transaction]) -> Vec<YearlyTotals> {
    let mut buckets: BTreeMap<i32, (f64, i64, f64)> = BTreeMap::new();
    for t in transactions {
        let bucket = buckets.entry(t.order_date.year()).or_default();
        bucket.0 += t.sales;
        bucket.1 += t.quantity;
        bucket.2 += t.profit;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    (first..=last)
        .filter_map(|year| {
            let year_end = NaiveDate::from_ymd_opt(year, 12, 31)?;
            let (sales, quantity, profit) = buckets.get(&year).copied().unwrap_or_default();
            Some(YearlyTotals {
                year_end,
                sales,
                quantity,
                profit,
            })
        })
        .collect()
}

pub fn segment_sales_quantity_profit(transactions: &[Transaction]) -> Vec<SegmentTotals> {
    let mut groups: BTreeMap<&Key, (f64, i64, f64)> = BTreeMap::new();
    for t in transactions {
        let group = groups.entry(&t.segment).or_default();
        group.0 += t.sales;
        group.1 += t.quantity;
        group.2 += t.profit;
    }
    groups
        .into_iter()
        .map(|(segment, (sales, quantity, profit))| SegmentTotals {
            segment: segment.clone(),
            sales,
            quantity,
            profit,
        })
        .collect()
}

/// All derived views for one dashboard render, plus the grand-total
/// annotation shown in the category and segment charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub category_sales: Vec<CategorySales>,
    pub segment_sales: Vec<SegmentSales>,
    pub segment_hierarchy: Vec<HierarchySales>,
    pub top_customers: Vec<CustomerProfit>,
    pub top_customer_profit: Vec<CustomerYearProfit>,
    pub yearly_totals: Vec<YearlyTotals>,
    pub segment_totals: Vec<SegmentTotals>,
    pub total_sales: f64,
    pub total_sales_label: String,
}

impl DashboardViews {
    pub fn compute(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            log::warn!("transaction table is empty; all views will be empty");
        }

        let category_sales = category_sales(transactions);
        let total_sales: f64 = category_sales.iter().map(|c| c.sales).sum();

        let views = Self {
            segment_sales: segment_sales(transactions),
            segment_hierarchy: segment_category_subcategory_sales(transactions),
            top_customers: top_customers_by_profit(transactions, TOP_CUSTOMER_COUNT),
            top_customer_profit: top_customer_profit_by_year(transactions),
            yearly_totals: yearly_sales_quantity_profit(transactions),
            segment_totals: segment_sales_quantity_profit(transactions),
            total_sales_label: format_currency(total_sales),
            category_sales,
            total_sales,
        };

        log::debug!(
            "computed views: {} categories, {} segments, {} hierarchy leaves, {} top customers, {} years",
            views.category_sales.len(),
            views.segment_sales.len(),
            views.segment_hierarchy.len(),
            views.top_customers.len(),
            views.yearly_totals.len(),
        );

        views
    }

    /// Distinct years covered by the top-customer view, ascending.
    pub fn top_customer_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.top_customer_profit.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }
}
