//! Catalog service enforcing consistency between products and inventory.

use catalog_store::{InventoryStore, ProductStore, StoreError};
use common::{InventoryEntry, Product};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::validation;

/// Service mediating every write to the product and inventory stores.
///
/// Inventory entries may only reference existing products, names are unique,
/// and a product referenced by inventory cannot be deleted. Every check runs
/// before the first mutation, so a rejected request leaves both stores as
/// they were.
#[derive(Clone)]
pub struct CatalogService<P: ProductStore, I: InventoryStore> {
    products: P,
    inventory: I,
}

impl<P: ProductStore, I: InventoryStore> CatalogService<P, I> {
    /// Creates a new catalog service over the given stores.
    pub fn new(products: P, inventory: I) -> Self {
        Self {
            products,
            inventory,
        }
    }

    /// Returns a reference to the product store.
    pub fn products(&self) -> &P {
        &self.products
    }

    /// Returns a reference to the inventory store.
    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Lists every product.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Creates a product after trimming and validating its name.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, raw_name: &str) -> Result<Product> {
        let name = validation::product_name(raw_name).inspect_err(record_rejection)?;

        if self.products.exists(&name).await? {
            let err = CatalogError::ProductExists(name);
            record_rejection(&err);
            return Err(err);
        }

        let product = self
            .products
            .create(&name)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(name) => CatalogError::ProductExists(name),
                other => product_store_error(other),
            })
            .inspect_err(record_rejection)?;

        metrics::counter!("catalog_products_created_total").increment(1);
        tracing::info!(name = %product.name, "product created");
        Ok(product)
    }

    /// Renames a product.
    ///
    /// Inventory entries keep the name they were saved with; they are not
    /// rewritten to follow the rename.
    #[tracing::instrument(skip(self))]
    pub async fn rename_product(&self, old_name: &str, new_name: &str) -> Result<Product> {
        let old_name = validation::existing_product_name(old_name).inspect_err(record_rejection)?;
        let new_name = validation::product_name(new_name).inspect_err(record_rejection)?;

        if !self.products.exists(&old_name).await? {
            let err = CatalogError::ProductNotFound(old_name);
            record_rejection(&err);
            return Err(err);
        }

        if old_name != new_name && self.products.exists(&new_name).await? {
            let err = CatalogError::DuplicateProduct(new_name);
            record_rejection(&err);
            return Err(err);
        }

        let product = self
            .products
            .rename(&old_name, &new_name)
            .await
            .map_err(product_store_error)
            .inspect_err(record_rejection)?;

        metrics::counter!("catalog_products_renamed_total").increment(1);
        tracing::info!(from = %old_name, to = %product.name, "product renamed");
        Ok(product)
    }

    /// Deletes a product that no inventory entry references.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, name: &str) -> Result<()> {
        let name = validation::existing_product_name(name).inspect_err(record_rejection)?;

        if !self.products.exists(&name).await? {
            let err = CatalogError::ProductNotFound(name);
            record_rejection(&err);
            return Err(err);
        }

        if self.inventory.contains_product(&name).await? {
            let err = CatalogError::ProductInInventory(name);
            record_rejection(&err);
            return Err(err);
        }

        self.products
            .delete(&name)
            .await
            .map_err(product_store_error)
            .inspect_err(record_rejection)?;

        metrics::counter!("catalog_products_deleted_total").increment(1);
        tracing::info!(%name, "product deleted");
        Ok(())
    }

    /// Returns the current inventory snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn get_inventory(&self) -> Result<Vec<InventoryEntry>> {
        Ok(self.inventory.list().await?)
    }

    /// Validates candidate entries and replaces the inventory with them.
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// the payload must be a sequence; then, entry by entry, the name and
    /// quantity are checked before the referenced product's existence;
    /// finally the whole set is scanned for duplicate names.
    #[tracing::instrument(skip(self, candidates))]
    pub async fn save_inventory(&self, candidates: &Value) -> Result<Vec<InventoryEntry>> {
        let entries = self
            .validate_candidates(candidates)
            .await
            .inspect_err(record_rejection)?;

        metrics::histogram!("catalog_inventory_save_entries").record(entries.len() as f64);
        let saved = self.inventory.replace_all(entries).await?;

        metrics::counter!("catalog_inventory_saves_total").increment(1);
        tracing::info!(entries = saved.len(), "inventory saved");
        Ok(saved)
    }

    /// Empties the inventory.
    #[tracing::instrument(skip(self))]
    pub async fn reset_inventory(&self) -> Result<Vec<InventoryEntry>> {
        let cleared = self.inventory.clear().await?;
        metrics::counter!("catalog_inventory_resets_total").increment(1);
        tracing::info!("inventory reset");
        Ok(cleared)
    }

    async fn validate_candidates(&self, candidates: &Value) -> Result<Vec<InventoryEntry>> {
        let candidates = validation::candidate_entries(candidates)?;

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let entry = validation::candidate_entry(candidate)?;
            if !self.products.exists(&entry.name).await? {
                return Err(CatalogError::UnknownProduct(entry.name));
            }
            entries.push(entry);
        }

        if let Some(name) = validation::first_duplicate(&entries) {
            return Err(CatalogError::DuplicateEntries(name.to_string()));
        }

        Ok(entries)
    }
}

fn product_store_error(err: StoreError) -> CatalogError {
    match err {
        StoreError::Duplicate(name) => CatalogError::DuplicateProduct(name),
        StoreError::NotFound(name) => CatalogError::ProductNotFound(name),
        other => CatalogError::Store(other),
    }
}

fn record_rejection(err: &CatalogError) {
    if matches!(err, CatalogError::Store(_)) {
        return;
    }
    metrics::counter!("catalog_rejections_total", "reason" => err.reason()).increment(1);
    tracing::warn!(reason = err.reason(), error = %err, "request rejected");
}
