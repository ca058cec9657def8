use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow, types::Json};

use crate::{
    InventoryEntry, Product, Result, StoreError,
    store::{InventoryStore, ProductStore},
};

const PRODUCT_NAME_CONSTRAINT: &str = "products_name_unique";
const INVENTORY_NAME_INDEX: &str = "idx_inventory_items_product_name";

/// Runs the database migrations shared by the product and inventory stores.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

fn is_violation_of(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.constraint() == Some(constraint))
}

/// PostgreSQL-backed product store.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgreSQL product store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        run_migrations(&self.pool).await
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn list(&self) -> Result<Vec<Product>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(names.into_iter().map(Product::new).collect())
    }

    async fn create(&self, name: &str) -> Result<Product> {
        let stored: String =
            sqlx::query_scalar("INSERT INTO products (name) VALUES ($1) RETURNING name")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    if is_violation_of(&e, PRODUCT_NAME_CONSTRAINT) {
                        return StoreError::Duplicate(name.to_string());
                    }
                    StoreError::Database(e)
                })?;
        Ok(Product::new(stored))
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<Product> {
        if old_name == new_name {
            return if self.exists(old_name).await? {
                Ok(Product::new(old_name))
            } else {
                Err(StoreError::NotFound(old_name.to_string()))
            };
        }

        let renamed: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET name = $2, updated_at = NOW()
            WHERE name = $1
            RETURNING name
            "#,
        )
        .bind(old_name)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_violation_of(&e, PRODUCT_NAME_CONSTRAINT) {
                return StoreError::Duplicate(new_name.to_string());
            }
            StoreError::Database(e)
        })?;

        renamed
            .map(Product::new)
            .ok_or_else(|| StoreError::NotFound(old_name.to_string()))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Physical layout used to persist the inventory snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryLayout {
    /// One row holding the entries as a JSONB array.
    Document,
    /// One row per entry, unique on product name.
    #[default]
    Collection,
}

impl std::fmt::Display for InventoryLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryLayout::Document => write!(f, "document"),
            InventoryLayout::Collection => write!(f, "collection"),
        }
    }
}

impl std::str::FromStr for InventoryLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(InventoryLayout::Document),
            "collection" => Ok(InventoryLayout::Collection),
            other => Err(format!("unknown inventory layout: {other}")),
        }
    }
}

/// PostgreSQL-backed inventory store.
///
/// Both layouts replace the snapshot atomically: the document layout with a
/// single-row upsert, the collection layout inside one transaction.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
    layout: InventoryLayout,
}

impl PostgresInventoryStore {
    /// Creates a new PostgreSQL inventory store using the given layout.
    pub fn new(pool: PgPool, layout: InventoryLayout) -> Self {
        Self { pool, layout }
    }

    /// Moves the entries of the inventory document into the collection
    /// layout and removes the document.
    ///
    /// Returns the number of migrated entries. An absent or empty document
    /// leaves both tables untouched.
    #[tracing::instrument(skip(self))]
    pub async fn migrate_document_to_collection(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let document: Option<Json<Vec<InventoryEntry>>> =
            sqlx::query_scalar("SELECT items FROM inventory_documents WHERE id = 1 FOR UPDATE")
                .fetch_optional(&mut *tx)
                .await?;

        let entries = document.map(|d| d.0).unwrap_or_default();
        if entries.is_empty() {
            tracing::info!("no inventory document entries to migrate");
            tx.commit().await?;
            return Ok(0);
        }

        sqlx::query("DELETE FROM inventory_items")
            .execute(&mut *tx)
            .await?;
        insert_items(&mut *tx, &entries).await?;
        sqlx::query("DELETE FROM inventory_documents WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(migrated = entries.len(), "inventory document migrated");
        Ok(entries.len())
    }

    async fn list_document(&self) -> Result<Vec<InventoryEntry>> {
        let document: Option<Json<Vec<InventoryEntry>>> =
            sqlx::query_scalar("SELECT items FROM inventory_documents WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(document.map(|d| d.0).unwrap_or_default())
    }

    async fn list_collection(&self) -> Result<Vec<InventoryEntry>> {
        let rows = sqlx::query(
            "SELECT product_name, quantity FROM inventory_items ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn write_document(&self, entries: &[InventoryEntry]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory_documents (id, items)
            VALUES (1, $1)
            ON CONFLICT (id) DO UPDATE SET items = EXCLUDED.items, updated_at = NOW()
            "#,
        )
        .bind(Json(entries))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn write_collection(&self, entries: &[InventoryEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM inventory_items")
            .execute(&mut *tx)
            .await?;
        insert_items(&mut *tx, entries).await?;
        tx.commit().await?;
        Ok(())
    }
}

fn row_to_entry(row: PgRow) -> Result<InventoryEntry> {
    let name: String = row.try_get("product_name")?;
    let quantity: i64 = row.try_get("quantity")?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| StoreError::InvalidData(format!("quantity {quantity} for {name}")))?;
    Ok(InventoryEntry { name, quantity })
}

async fn insert_items(conn: &mut PgConnection, entries: &[InventoryEntry]) -> Result<()> {
    for (position, entry) in entries.iter().enumerate() {
        let position = i32::try_from(position)
            .map_err(|_| StoreError::InvalidData(format!("position {position}")))?;

        sqlx::query(
            r#"
            INSERT INTO inventory_items (product_name, quantity, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&entry.name)
        .bind(i64::from(entry.quantity))
        .bind(position)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_violation_of(&e, INVENTORY_NAME_INDEX) {
                return StoreError::Duplicate(entry.name.clone());
            }
            StoreError::Database(e)
        })?;
    }
    Ok(())
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn list(&self) -> Result<Vec<InventoryEntry>> {
        match self.layout {
            InventoryLayout::Document => self.list_document().await,
            InventoryLayout::Collection => self.list_collection().await,
        }
    }

    async fn replace_all(&self, entries: Vec<InventoryEntry>) -> Result<Vec<InventoryEntry>> {
        match self.layout {
            InventoryLayout::Document => self.write_document(&entries).await?,
            InventoryLayout::Collection => self.write_collection(&entries).await?,
        }
        Ok(entries)
    }

    async fn clear(&self) -> Result<Vec<InventoryEntry>> {
        match self.layout {
            InventoryLayout::Document => self.write_document(&[]).await?,
            InventoryLayout::Collection => {
                sqlx::query("DELETE FROM inventory_items")
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(Vec::new())
    }

    async fn contains_product(&self, name: &str) -> Result<bool> {
        let sql = match self.layout {
            InventoryLayout::Document => {
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM inventory_documents
                    WHERE id = 1 AND items @> jsonb_build_array(jsonb_build_object('name', $1::text))
                )
                "#
            }
            InventoryLayout::Collection => {
                "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE product_name = $1)"
            }
        };

        let exists: bool = sqlx::query_scalar(sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
