//! Web server adapter.
//!
//! Serves the dashboard page at `/returnoninvestment` with an HTMX-driven
//! product table. Views are computed once when the state is built and
//! shared read-only between requests.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::aggregation::DashboardViews;
use crate::domain::transaction::Transaction;

pub struct AppState {
    pub transactions: Vec<Transaction>,
    pub views: DashboardViews,
    pub title: String,
    pub page_size: usize,
}

impl AppState {
    pub fn new(transactions: Vec<Transaction>, title: impl Into<String>, page_size: usize) -> Self {
        let views = DashboardViews::compute(&transactions);
        Self {
            transactions,
            views,
            title: title.into(),
            page_size,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/returnoninvestment", get(handlers::dashboard))
        .route("/returnoninvestment/products", get(handlers::products))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
