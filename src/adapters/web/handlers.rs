//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::domain::product_table::{ProductQuery, query_products};

use super::templates::{
    DashboardTemplate, ProductTableTemplate, ProductTableView, ProductsTemplate,
};
use super::{AppState, WebError, is_htmx_request};

/// Raw product-table query string. Every field is optional and empty
/// values mean "no filter".
#[derive(Debug, Default, serde::Deserialize)]
pub struct ProductParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub page: Option<String>,
}

impl ProductParams {
    pub fn to_query(&self, page_size: usize) -> Result<ProductQuery, WebError> {
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse()
                .map_err(|_| WebError::bad_request(format!("Invalid page number '{}'", raw)))?,
        };
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        Ok(ProductQuery {
            search: non_empty(&self.search),
            category: non_empty(&self.category),
            sub_category: non_empty(&self.sub_category),
            page,
            page_size,
        })
    }
}

pub async fn index() -> Redirect {
    Redirect::to("/returnoninvestment")
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let query = ProductQuery {
        page_size: state.page_size,
        ..Default::default()
    };
    let page = query_products(&state.transactions, &query)?;

    let template = DashboardTemplate::new(
        &state.title,
        &state.views,
        ProductTableView::new(page, &query)?,
    );
    Ok(Html(template.render()?).into_response())
}

pub async fn products(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ProductParams>,
) -> Result<Response, WebError> {
    let query = params.to_query(state.page_size)?;
    let page = query_products(&state.transactions, &query)?;
    let products = ProductTableView::new(page, &query)?;

    let html = if is_htmx_request(&headers) {
        ProductTableTemplate { products }.render()?
    } else {
        ProductsTemplate {
            title: state.title.clone(),
            products,
        }
        .render()?
    };
    Ok(Html(html).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
