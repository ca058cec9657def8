//! HTTP route handlers.

pub mod health;
pub mod inventory;
pub mod metrics;
pub mod products;

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({ "error": "Route not found" })),
    )
}
