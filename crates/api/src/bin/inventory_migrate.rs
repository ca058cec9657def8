//! Moves the inventory from the document layout into the collection layout.

use api::config::Config;
use catalog_store::{InventoryLayout, PostgresInventoryStore, postgres};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    api::telemetry::init_tracing(&config.log_level, config.log_format);

    let Some(url) = config.database_url.as_deref() else {
        tracing::error!("DATABASE_URL must be set to migrate the inventory");
        std::process::exit(1);
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .expect("failed to connect to database");

    if let Err(e) = postgres::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let store = PostgresInventoryStore::new(pool.clone(), InventoryLayout::Collection);
    let exit_code = match store.migrate_document_to_collection().await {
        Ok(0) => {
            tracing::info!("no inventory document found, nothing to migrate");
            0
        }
        Ok(migrated) => {
            tracing::info!(migrated, "inventory migration completed");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "inventory migration failed");
            1
        }
    };

    pool.close().await;
    std::process::exit(exit_code);
}
