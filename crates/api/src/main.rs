//! API server entry point.

use api::config::Config;
use catalog_store::{
    InMemoryInventoryStore, InMemoryProductStore, InventoryStore, PostgresInventoryStore,
    PostgresProductStore, ProductStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Binds the listener and serves the application until shutdown.
async fn serve<P: ProductStore + 'static, I: InventoryStore + 'static>(
    config: &Config,
    products: P,
    inventory: I,
    metrics_handle: PrometheusHandle,
) {
    let state = api::create_state(products, inventory);
    let app = api::create_app(state, metrics_handle, config);

    let addr = config.addr();
    tracing::info!(%addr, environment = ?config.environment, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

#[tokio::main]
async fn main() {
    // 1. Load .env (if present) and configuration
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // 2. Initialize tracing
    api::telemetry::init_tracing(&config.log_level, config.log_format);
    for var in &config.invalid_vars {
        tracing::warn!(%var, "invalid environment value, using default");
    }

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Build stores and serve
    match config.database_url.as_deref() {
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory stores");
            serve(
                &config,
                InMemoryProductStore::new(),
                InMemoryInventoryStore::new(),
                metrics_handle,
            )
            .await;
        }
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .expect("failed to connect to database");

            let products = PostgresProductStore::new(pool.clone());
            products
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!(layout = %config.inventory_layout, "using PostgreSQL stores");

            let inventory = PostgresInventoryStore::new(pool.clone(), config.inventory_layout);
            serve(&config, products, inventory, metrics_handle).await;

            pool.close().await;
            tracing::info!("database pool closed");
        }
    }

    tracing::info!("server shut down gracefully");
}
