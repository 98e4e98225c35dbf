//! HTML templates using Askama.

use askama::Template;
use chrono::Datelike;
use serde::Serialize;

use crate::adapters::typst_report::chart_svg;
use crate::domain::aggregation::{DashboardViews, rollup_categories};
use crate::domain::currency::format_currency;
use crate::domain::error::DashboardError;
use crate::domain::product_table::{ProductPage, ProductQuery};
use crate::domain::transaction::label;

/// One row of a label/amount table, preformatted for display.
pub struct AmountRow {
    pub label: String,
    pub amount: String,
    pub share: String,
}

pub struct HierarchyRow {
    pub segment: String,
    pub category: String,
    pub sub_category: String,
    pub sales: String,
    pub is_subtotal: bool,
}

pub struct MeasureRow {
    pub label: String,
    pub sales: String,
    pub quantity: i64,
    pub profit: String,
}

pub struct ProductCells {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub sub_category: String,
}

/// Product grid state shared by the full pages and the HTMX fragment.
pub struct ProductTableView {
    pub rows: Vec<ProductCells>,
    pub total_rows: usize,
    pub page: usize,
    pub total_pages: usize,
    pub search: String,
    pub category: String,
    pub sub_category: String,
    pub previous_link: Option<String>,
    pub next_link: Option<String>,
}

fn share(part: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.1}%", part / total * 100.0)
    } else {
        "-".to_string()
    }
}

/// Query string of a product-table navigation link.
#[derive(Serialize)]
struct ProductLinkParams<'a> {
    search: &'a str,
    category: &'a str,
    sub_category: &'a str,
    page: usize,
}

impl ProductTableView {
    pub fn new(page: ProductPage, query: &ProductQuery) -> Result<Self, DashboardError> {
        let search = query.search.clone().unwrap_or_default();
        let category = query.category.clone().unwrap_or_default();
        let sub_category = query.sub_category.clone().unwrap_or_default();

        let link = |target: usize| -> Result<String, DashboardError> {
            let params = serde_urlencoded::to_string(ProductLinkParams {
                search: &search,
                category: &category,
                sub_category: &sub_category,
                page: target,
            })
            .map_err(|e| DashboardError::Render {
                reason: format!("failed to encode product link: {}", e),
            })?;
            Ok(format!("/returnoninvestment/products?{}", params))
        };

        // Past the end, step back to the last page.
        let previous_target = page.page.saturating_sub(1).min(page.total_pages.max(1));
        let previous_link = page
            .has_previous()
            .then(|| link(previous_target))
            .transpose()?;
        let next_link = page.has_next().then(|| link(page.page + 1)).transpose()?;

        let rows = page
            .rows
            .iter()
            .map(|r| ProductCells {
                product_id: label(&r.product_id).to_string(),
                product_name: label(&r.product_name).to_string(),
                category: label(&r.category).to_string(),
                sub_category: label(&r.sub_category).to_string(),
            })
            .collect();

        Ok(Self {
            rows,
            total_rows: page.total_rows,
            page: page.page,
            total_pages: page.total_pages,
            search,
            category,
            sub_category,
            previous_link,
            next_link,
        })
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub total_sales: String,
    pub category_rows: Vec<AmountRow>,
    pub segment_rows: Vec<AmountRow>,
    pub hierarchy_rows: Vec<HierarchyRow>,
    pub top_customer_rows: Vec<AmountRow>,
    pub top_customer_svg: String,
    pub yearly_rows: Vec<MeasureRow>,
    pub yearly_svg: String,
    pub segment_total_rows: Vec<MeasureRow>,
    pub products: ProductTableView,
}

impl DashboardTemplate {
    pub fn new(title: &str, views: &DashboardViews, products: ProductTableView) -> Self {
        let category_rows = views
            .category_sales
            .iter()
            .map(|r| AmountRow {
                label: label(&r.category).to_string(),
                amount: format_currency(r.sales),
                share: share(r.sales, views.total_sales),
            })
            .collect();

        let segment_rows = views
            .segment_sales
            .iter()
            .map(|r| AmountRow {
                label: label(&r.segment).to_string(),
                amount: format_currency(r.sales),
                share: share(r.sales, views.total_sales),
            })
            .collect();

        let mut hierarchy_rows = Vec::new();
        for parent in rollup_categories(&views.segment_hierarchy) {
            hierarchy_rows.push(HierarchyRow {
                segment: label(&parent.segment).to_string(),
                category: label(&parent.category).to_string(),
                sub_category: String::new(),
                sales: format_currency(parent.sales),
                is_subtotal: true,
            });
            hierarchy_rows.extend(
                views
                    .segment_hierarchy
                    .iter()
                    .filter(|l| l.segment == parent.segment && l.category == parent.category)
                    .map(|l| HierarchyRow {
                        segment: String::new(),
                        category: String::new(),
                        sub_category: label(&l.sub_category).to_string(),
                        sales: format_currency(l.sales),
                        is_subtotal: false,
                    }),
            );
        }

        let top_profit: f64 = views.top_customers.iter().map(|c| c.profit).sum();
        let top_customer_rows = views
            .top_customers
            .iter()
            .map(|c| AmountRow {
                label: label(&c.customer).to_string(),
                amount: format_currency(c.profit),
                share: share(c.profit, top_profit),
            })
            .collect();

        let yearly_rows = views
            .yearly_totals
            .iter()
            .map(|r| MeasureRow {
                label: r.year_end.year().to_string(),
                sales: format_currency(r.sales),
                quantity: r.quantity,
                profit: format_currency(r.profit),
            })
            .collect();

        let segment_total_rows = views
            .segment_totals
            .iter()
            .map(|r| MeasureRow {
                label: label(&r.segment).to_string(),
                sales: format_currency(r.sales),
                quantity: r.quantity,
                profit: format_currency(r.profit),
            })
            .collect();

        Self {
            title: title.to_string(),
            total_sales: views.total_sales_label.clone(),
            category_rows,
            segment_rows,
            hierarchy_rows,
            top_customer_rows,
            top_customer_svg: chart_svg::generate_top_customer_svg(
                &views.top_customers,
                &views.top_customer_profit,
                &views.top_customer_years(),
            ),
            yearly_rows,
            yearly_svg: chart_svg::generate_yearly_svg(&views.yearly_totals),
            segment_total_rows,
            products,
        }
    }
}

#[derive(Template)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub title: String,
    pub products: ProductTableView,
}

#[derive(Template)]
#[template(path = "product_table.html")]
pub struct ProductTableTemplate {
    pub products: ProductTableView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product_table::ProductRow;

    #[test]
    fn product_view_builds_navigation_links() {
        let page = ProductPage {
            rows: vec![ProductRow {
                product_id: Some("OFF-LA-1".into()),
                product_name: None,
                category: Some("Office Supplies".into()),
                sub_category: Some("Labels".into()),
            }],
            total_rows: 30,
            page: 2,
            page_size: 10,
            total_pages: 3,
        };
        let query = ProductQuery {
            category: Some("Office Supplies".into()),
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        let view = ProductTableView::new(page, &query).unwrap();
        assert_eq!(view.rows[0].product_name, "(missing)");
        assert_eq!(
            view.previous_link.as_deref(),
            Some("/returnoninvestment/products?search=&category=Office+Supplies&sub_category=&page=1")
        );
        assert!(view.next_link.as_deref().unwrap().ends_with("page=3"));
    }

    fn empty_page(page: usize, total_pages: usize) -> ProductPage {
        ProductPage {
            rows: Vec::new(),
            total_rows: total_pages * 10,
            page,
            page_size: 10,
            total_pages,
        }
    }

    #[test]
    fn filter_values_are_url_encoded_in_links() {
        let query = ProductQuery {
            search: Some("a&b=c".into()),
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        let view = ProductTableView::new(empty_page(2, 3), &query).unwrap();
        assert_eq!(
            view.next_link.as_deref(),
            Some("/returnoninvestment/products?search=a%26b%3Dc&category=&sub_category=&page=3")
        );
    }

    #[test]
    fn previous_link_past_the_end_targets_last_page() {
        let query = ProductQuery {
            page: 9,
            page_size: 10,
            ..Default::default()
        };
        let view = ProductTableView::new(empty_page(9, 3), &query).unwrap();
        assert!(view.previous_link.as_deref().unwrap().ends_with("page=3"));
        assert!(view.next_link.is_none());
    }
}
