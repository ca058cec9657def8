//! Integration tests for the API server.

use std::sync::Arc;

use api::AppState;
use api::config::{Config, Environment};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_store::{InMemoryInventoryStore, InMemoryProductStore, InventoryStore, ProductStore};
use common::InventoryEntry;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

type State = Arc<AppState<InMemoryProductStore, InMemoryInventoryStore>>;

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    setup_with_state().0
}

fn setup_with_state() -> (axum::Router, State) {
    let state = api::create_default_state();
    let app = api::create_app(state.clone(), get_metrics_handle(), &Config::default());
    (app, state)
}

async fn setup_with_products(names: &[&str]) -> (axum::Router, State) {
    let (app, state) = setup_with_state();
    for name in names {
        state.catalog.products().create(name).await.unwrap();
    }
    (app, state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup();

    let (status, json) = send(&app, empty_request("GET", "/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Route not found");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .oneshot(empty_request("GET", "/metrics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

mod products {
    use super::*;

    #[tokio::test]
    async fn test_list_empty() {
        let app = setup();

        let (status, json) = send(&app, empty_request("GET", "/product/all")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_all() {
        let (app, _) = setup_with_products(&["Product 1", "Product 2"]).await;

        let (status, json) = send(&app, empty_request("GET", "/product/all")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([{ "name": "Product 1" }, { "name": "Product 2" }])
        );
    }

    #[tokio::test]
    async fn test_create() {
        let app = setup();

        let (status, json) = send(
            &app,
            json_request("PUT", "/product", serde_json::json!({ "name": "Test Product" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json, serde_json::json!({ "name": "Test Product" }));
    }

    #[tokio::test]
    async fn test_create_empty_or_missing_name() {
        let app = setup();

        for body in [
            serde_json::json!({ "name": "" }),
            serde_json::json!({ "name": "   " }),
            serde_json::json!({}),
        ] {
            let (status, json) = send(&app, json_request("PUT", "/product", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_create_too_long_name() {
        let app = setup();

        let (status, _) = send(
            &app,
            json_request("PUT", "/product", serde_json::json!({ "name": "x".repeat(101) })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let app = setup();

        let request = Request::builder()
            .method("PUT")
            .uri("/product")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let app = setup();
        let body = serde_json::json!({ "name": "Test Product" });

        send(&app, json_request("PUT", "/product", body.clone())).await;
        let (status, json) = send(&app, json_request("PUT", "/product", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "product name already exists");
    }

    #[tokio::test]
    async fn test_rename() {
        let (app, state) = setup_with_products(&["Old Name"]).await;

        let (status, json) = send(
            &app,
            json_request(
                "PATCH",
                "/product/Old%20Name",
                serde_json::json!({ "name": "New Name" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "name": "New Name" }));
        assert!(!state.catalog.products().exists("Old Name").await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_missing() {
        let app = setup();

        let (status, json) = send(
            &app,
            json_request(
                "PATCH",
                "/product/Non-existent",
                serde_json::json!({ "name": "New Name" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Product \"Non-existent\" not found");
    }

    #[tokio::test]
    async fn test_rename_onto_existing() {
        let (app, _) = setup_with_products(&["Old Name", "Existing Name"]).await;

        let (status, _) = send(
            &app,
            json_request(
                "PATCH",
                "/product/Old%20Name",
                serde_json::json!({ "name": "Existing Name" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_rename_same_name() {
        let (app, _) = setup_with_products(&["Old Name"]).await;

        let (status, _) = send(
            &app,
            json_request(
                "PATCH",
                "/product/Old%20Name",
                serde_json::json!({ "name": "Old Name" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete() {
        let (app, _) = setup_with_products(&["Test Product"]).await;

        let (status, json) = send(&app, empty_request("DELETE", "/product/Test%20Product")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Product deleted successfully");
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let app = setup();

        let (status, _) = send(&app, empty_request("DELETE", "/product/Non-existent")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_product_in_inventory() {
        let (app, state) = setup_with_products(&["Test Product"]).await;
        state
            .catalog
            .inventory()
            .replace_all(vec![InventoryEntry::new("Test Product", 5)])
            .await
            .unwrap();

        let (status, json) = send(&app, empty_request("DELETE", "/product/Test%20Product")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "Cannot delete product \"Test Product\" as it exists in inventory"
        );
        assert!(state.catalog.products().exists("Test Product").await.unwrap());
    }
}

mod inventory {
    use super::*;

    #[tokio::test]
    async fn test_get_empty() {
        let app = setup();

        let (status, json) = send(&app, empty_request("GET", "/inventory")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_current() {
        let (app, state) = setup_with_products(&["Product 1", "Product 2"]).await;
        state
            .catalog
            .inventory()
            .replace_all(vec![
                InventoryEntry::new("Product 1", 5),
                InventoryEntry::new("Product 2", 10),
            ])
            .await
            .unwrap();

        let (status, json) = send(&app, empty_request("GET", "/inventory")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_wrapped_items() {
        let (app, _) = setup_with_products(&["Product 1", "Product 2"]).await;
        let items = serde_json::json!([
            { "name": "Product 1", "quantity": 5 },
            { "name": "Product 2", "quantity": 10 }
        ]);

        let (status, json) = send(
            &app,
            json_request("POST", "/inventory", serde_json::json!({ "items": items.clone() })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, items);
    }

    #[tokio::test]
    async fn test_save_bare_array() {
        let (app, _) = setup_with_products(&["Widget"]).await;
        let items = serde_json::json!([{ "name": "Widget", "quantity": 5 }]);

        let (status, json) = send(&app, json_request("POST", "/inventory", items.clone())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, items);
    }

    #[tokio::test]
    async fn test_save_rejections() {
        let (app, state) = setup_with_products(&["Product 1"]).await;

        let cases = [
            (
                serde_json::json!({ "items": "not an array" }),
                "Inventory must be an array",
            ),
            (
                serde_json::json!({ "items": [{ "quantity": 5 }] }),
                "Each item must have a valid name",
            ),
            (
                serde_json::json!({ "items": [{ "name": "Product 1", "quantity": 0 }] }),
                "Item \"Product 1\" must have a positive quantity",
            ),
            (
                serde_json::json!({ "items": [{ "name": "Non-existent", "quantity": 5 }] }),
                "Some of the inventory items are missing in the products list",
            ),
            (
                serde_json::json!({ "items": [
                    { "name": "Product 1", "quantity": 5 },
                    { "name": "Product 1", "quantity": 10 }
                ] }),
                "Inventory contains duplicate products",
            ),
        ];

        for (body, message) in cases {
            let (status, json) = send(&app, json_request("POST", "/inventory", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], message);
        }

        assert!(state.catalog.get_inventory().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let (app, _) = setup_with_products(&["Product 1", "Product 2"]).await;

        send(
            &app,
            json_request(
                "POST",
                "/inventory",
                serde_json::json!({ "items": [{ "name": "Product 1", "quantity": 5 }] }),
            ),
        )
        .await;
        let (status, json) = send(
            &app,
            json_request(
                "POST",
                "/inventory",
                serde_json::json!({ "items": [{ "name": "Product 2", "quantity": 10 }] }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([{ "name": "Product 2", "quantity": 10 }])
        );
    }

    #[tokio::test]
    async fn test_reset() {
        let (app, state) = setup_with_products(&["Product 1"]).await;
        state
            .catalog
            .inventory()
            .replace_all(vec![InventoryEntry::new("Product 1", 5)])
            .await
            .unwrap();

        let (status, json) = send(&app, empty_request("POST", "/inventory/reset")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_reset_empty() {
        let app = setup();

        let (status, json) = send(&app, empty_request("POST", "/inventory/reset")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }
}

mod error_details {
    use super::*;

    #[tokio::test]
    async fn test_development_includes_stack() {
        let app = setup();

        let (status, json) = send(&app, empty_request("DELETE", "/product/Missing")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["stack"].is_string());
    }

    #[tokio::test]
    async fn test_production_hides_stack() {
        let config = Config {
            environment: Environment::Production,
            ..Config::default()
        };
        let app = api::create_app(api::create_default_state(), get_metrics_handle(), &config);

        let (status, json) = send(&app, empty_request("DELETE", "/product/Missing")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Product \"Missing\" not found");
        assert!(json.get("stack").is_none());
    }
}
