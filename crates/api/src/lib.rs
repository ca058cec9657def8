//! HTTP API server for the product catalog and inventory.
//!
//! Provides REST endpoints for products and the inventory snapshot, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use catalog_store::{InMemoryInventoryStore, InMemoryProductStore, InventoryStore, ProductStore};
use domain::CatalogService;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::ErrorDetails;

/// Shared application state accessible from all handlers.
pub struct AppState<P: ProductStore, I: InventoryStore> {
    pub catalog: CatalogService<P, I>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P: ProductStore + 'static, I: InventoryStore + 'static>(
    state: Arc<AppState<P, I>>,
    metrics_handle: PrometheusHandle,
    config: &Config,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let mut app = Router::new()
        .route("/health", get(routes::health::check))
        .route("/product/all", get(routes::products::list::<P, I>))
        .route("/product", put(routes::products::create::<P, I>))
        .route(
            "/product/{name}",
            patch(routes::products::rename::<P, I>).delete(routes::products::delete::<P, I>),
        )
        .route(
            "/inventory",
            get(routes::inventory::get::<P, I>).post(routes::inventory::save::<P, I>),
        )
        .route("/inventory/reset", post(routes::inventory::reset::<P, I>))
        .with_state(state)
        .merge(metrics_router)
        .fallback(routes::not_found);

    if config.exposes_error_details() {
        app = app.layer(axum::middleware::map_response(attach_error_details));
    }

    app.layer(cors_layer(&config.client_url))
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given stores.
pub fn create_state<P: ProductStore, I: InventoryStore>(
    products: P,
    inventory: I,
) -> Arc<AppState<P, I>> {
    Arc::new(AppState {
        catalog: CatalogService::new(products, inventory),
    })
}

/// Creates application state backed by fresh in-memory stores.
pub fn create_default_state() -> Arc<AppState<InMemoryProductStore, InMemoryInventoryStore>> {
    create_state(InMemoryProductStore::new(), InMemoryInventoryStore::new())
}

fn cors_layer(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(client_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(%client_url, "invalid CLIENT_URL, allowing any origin");
            layer.allow_origin(Any)
        }
    }
}

async fn attach_error_details(response: Response) -> Response {
    let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    let body = serde_json::json!({ "error": details.message, "stack": details.stack });
    (response.status(), axum::Json(body)).into_response()
}
