//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::DashboardError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<DashboardError> for WebError {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            DashboardError::MissingColumn { .. }
            | DashboardError::InvalidField { .. }
            | DashboardError::Csv { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        DashboardError::Render {
            reason: err.to_string(),
        }
        .into()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}: {}", self.status, self.message);
        } else {
            log::debug!("{}: {}", self.status, self.message);
        }

        let template = super::templates::ErrorTemplate {
            status: self.status.as_u16(),
            message: self.message.clone(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_maps_to_bad_request() {
        let err: WebError = DashboardError::InvalidQuery {
            reason: "page_size must be positive".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("page_size"));
    }

    #[test]
    fn schema_error_maps_to_unprocessable() {
        let err: WebError = DashboardError::MissingColumn {
            column: "Sales".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn io_error_maps_to_internal() {
        let err: WebError = DashboardError::Io(std::io::Error::other("disk gone")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
