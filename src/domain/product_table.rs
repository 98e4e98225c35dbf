//! Product grid: the searchable, paginated table under the charts.

use super::error::DashboardError;
use super::transaction::Transaction;

/// Rows per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
}

impl From<&Transaction> for ProductRow {
    fn from(t: &Transaction) -> Self {
        Self {
            product_id: t.product_id.clone(),
            product_name: t.product_name.clone(),
            category: t.category.clone(),
            sub_category: t.sub_category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Filters on product name, category and sub-category. Each is a
    /// case-insensitive substring match; blank means no filter.
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    /// 1-based; 0 is read as 1.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            sub_category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub rows: Vec<ProductRow>,
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl ProductPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|h| h.to_lowercase().contains(needle))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ProductQuery {
    /// Lowercased name, category and sub-category needles.
    fn needles(&self) -> [Option<String>; 3] {
        [&self.search, &self.category, &self.sub_category]
            .map(|filter| non_blank(filter).map(str::to_lowercase))
    }

    fn matches(t: &Transaction, needles: &[Option<String>; 3]) -> bool {
        let [name, category, sub_category] = needles;
        [
            (&t.product_name, name),
            (&t.category, category),
            (&t.sub_category, sub_category),
        ]
        .into_iter()
        .all(|(value, filter)| {
            filter
                .as_deref()
                .is_none_or(|needle| contains_ci(value, needle))
        })
    }
}

/// Filter the table and cut out one page, keeping source order.
pub fn query_products(
    transactions: &[Transaction],
    query: &ProductQuery,
) -> Result<ProductPage, DashboardError> {
    if query.page_size == 0 {
        return Err(DashboardError::InvalidQuery {
            reason: "page_size must be positive".into(),
        });
    }

    let needles = query.needles();
    let matching: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| ProductQuery::matches(t, &needles))
        .collect();

    let page = query.page.max(1);
    let total_rows = matching.len();
    let total_pages = total_rows.div_ceil(query.page_size);

    let rows = matching
        .into_iter()
        .skip((page - 1).saturating_mul(query.page_size))
        .take(query.page_size)
        .map(ProductRow::from)
        .collect();

    Ok(ProductPage {
        rows,
        total_rows,
        page,
        page_size: query.page_size,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product(id: &str, name: &str, category: &str, sub_category: &str) -> Transaction {
        Transaction {
            order_date: NaiveDate::from_ymd_opt(2016, 11, 8).unwrap(),
            customer_name: Some("Claire Gute".into()),
            category: Some(category.into()),
            sub_category: Some(sub_category.into()),
            segment: Some("Consumer".into()),
            product_id: Some(id.into()),
            product_name: Some(name.into()),
            sales: 10.0,
            quantity: 1,
            profit: 1.0,
        }
    }

    fn catalog() -> Vec<Transaction> {
        vec![
            product("FUR-BO-10001798", "Bush Somerset Collection Bookcase", "Furniture", "Bookcases"),
            product("FUR-CH-10000454", "Hon Deluxe Fabric Upholstered Stacking Chairs", "Furniture", "Chairs"),
            product("OFF-LA-10000240", "Self-Adhesive Address Labels", "Office Supplies", "Labels"),
            product("FUR-TA-10000577", "Bretford CR4500 Series Slim Rectangular Table", "Furniture", "Tables"),
            product("OFF-ST-10000760", "Eldon Fold 'N Roll Cart System", "Office Supplies", "Storage"),
        ]
    }

    #[test]
    fn default_query_returns_everything() {
        let page = query_products(&catalog(), &ProductQuery::default()).unwrap();
        assert_eq!(page.total_rows, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].product_id.as_deref(), Some("FUR-BO-10001798"));
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn search_is_case_insensitive_on_name_only() {
        let query = ProductQuery {
            search: Some("bookcase".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_rows, 1);

        let query = ProductQuery {
            search: Some("off-".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_rows, 0);
    }

    #[test]
    fn category_filters_match_substrings() {
        let query = ProductQuery {
            category: Some("SUPPL".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_rows, 2);

        let query = ProductQuery {
            sub_category: Some("ab".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        let subs: Vec<_> = page.rows.iter().map(|r| r.sub_category.clone().unwrap()).collect();
        assert_eq!(subs, vec!["Labels", "Tables"]);
    }

    #[test]
    fn category_filters_combine() {
        let query = ProductQuery {
            category: Some("furniture".into()),
            sub_category: Some("Chairs".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_rows, 1);
        assert_eq!(page.rows[0].sub_category.as_deref(), Some("Chairs"));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query = ProductQuery {
            search: Some("  ".into()),
            category: Some(String::new()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_rows, 5);
    }

    #[test]
    fn pagination_slices_in_source_order() {
        let query = ProductQuery {
            page: 2,
            page_size: 2,
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].product_id.as_deref(), Some("OFF-LA-10000240"));
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = query_products(
            &catalog(),
            &ProductQuery {
                page: 3,
                page_size: 2,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(last.rows.len(), 1);
    }

    #[test]
    fn page_past_end_is_empty() {
        let query = ProductQuery {
            page: 9,
            page_size: 2,
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_rows, 5);
    }

    #[test]
    fn page_zero_reads_as_first() {
        let query = ProductQuery {
            page: 0,
            page_size: 2,
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let query = ProductQuery {
            page_size: 0,
            ..Default::default()
        };
        let err = query_products(&catalog(), &query).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidQuery { .. }));
    }

    #[test]
    fn no_matches_has_zero_pages() {
        let query = ProductQuery {
            search: Some("nonexistent".into()),
            ..Default::default()
        };
        let page = query_products(&catalog(), &query).unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
    }
}
