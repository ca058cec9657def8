//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog_store::{InventoryStore, ProductStore};
use common::Product;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// -- Handlers --

/// GET /product/all — list every product.
#[tracing::instrument(skip(state))]
pub async fn list<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.list_products().await?))
}

/// PUT /product — create a product.
#[tracing::instrument(skip(state, payload))]
pub async fn create<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(req) = payload?;
    let name = req.name.unwrap_or_default();

    let product = state.catalog.create_product(&name).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /product/{name} — rename a product.
#[tracing::instrument(skip(state, payload))]
pub async fn rename<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
    Path(name): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(req) = payload?;
    let new_name = req.name.unwrap_or_default();

    let product = state.catalog.rename_product(&name, &new_name).await?;
    Ok(Json(product))
}

/// DELETE /product/{name} — delete a product not referenced by inventory.
#[tracing::instrument(skip(state))]
pub async fn delete<P: ProductStore + 'static, I: InventoryStore + 'static>(
    State(state): State<Arc<AppState<P, I>>>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete_product(&name).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}
