//! Inventory snapshot endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use catalog_store::{InventoryStore, ProductStore};
use common::InventoryEntry;
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;

/// GET /inventory — return the current snapshot.
#[tracing::instrument(skip(state))]
pub async fn get<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
) -> Result<Json<Vec<InventoryEntry>>, ApiError> {
    Ok(Json(state.catalog.get_inventory().await?))
}

/// POST /inventory — replace the snapshot.
///
/// Accepts either a bare array of entries or an object wrapping them under
/// `items`.
#[tracing::instrument(skip(state, payload))]
pub async fn save<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<InventoryEntry>>, ApiError> {
    let Json(body) = payload?;
    let candidates = unwrap_items(body);

    Ok(Json(state.catalog.save_inventory(&candidates).await?))
}

/// POST /inventory/reset — empty the snapshot.
#[tracing::instrument(skip(state))]
pub async fn reset<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
) -> Result<Json<Vec<InventoryEntry>>, ApiError> {
    Ok(Json(state.catalog.reset_inventory().await?))
}

fn unwrap_items(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("items").unwrap_or(Value::Null),
        other => other,
    }
}
