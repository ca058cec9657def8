//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_store::StoreError;
use domain::CatalogError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Catalog rule violation or store failure.
    Catalog(CatalogError),
}

/// Message and source chain of an error response.
///
/// Attached to every error response as an extension so that a layer can
/// expose the chain outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub stack: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let stack = match &self {
            ApiError::Catalog(err) => source_chain(err),
            other => format!("{other:?}"),
        };

        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Catalog(err) => catalog_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        let mut response = (status, axum::Json(body)).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails { message, stack });
        response
    }
}

fn catalog_error_to_response(err: CatalogError) -> (StatusCode, String) {
    match &err {
        CatalogError::InvalidInput(_)
        | CatalogError::ProductExists(_)
        | CatalogError::ProductInInventory(_)
        | CatalogError::UnknownProduct(_)
        | CatalogError::DuplicateEntries(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CatalogError::ProductNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CatalogError::DuplicateProduct(_) => (StatusCode::CONFLICT, err.to_string()),
        CatalogError::Store(StoreError::Duplicate(_)) => (StatusCode::CONFLICT, err.to_string()),
        CatalogError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, err.to_string()),
        CatalogError::Store(_) => {
            tracing::error!(error = %err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn source_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str("\ncaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
