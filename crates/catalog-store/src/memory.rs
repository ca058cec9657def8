use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    InventoryEntry, Product, Result, StoreError,
    store::{InventoryStore, ProductStore},
};

/// In-memory product store.
///
/// Products are kept in insertion order. Each instance owns its own state,
/// so tests can build a fresh store instead of resetting shared data.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    /// Creates a new empty product store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn create(&self, name: &str) -> Result<Product> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.name == name) {
            return Err(StoreError::Duplicate(name.to_string()));
        }

        let product = Product::new(name);
        products.push(product.clone());
        Ok(product)
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<Product> {
        let mut products = self.products.write().await;

        let index = products
            .iter()
            .position(|p| p.name == old_name)
            .ok_or_else(|| StoreError::NotFound(old_name.to_string()))?;

        if old_name != new_name && products.iter().any(|p| p.name == new_name) {
            return Err(StoreError::Duplicate(new_name.to_string()));
        }

        products[index].name = new_name.to_string();
        Ok(products[index].clone())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        products.remove(index);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.products.read().await.iter().any(|p| p.name == name))
    }
}

/// In-memory inventory store holding a single snapshot.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    entries: Arc<RwLock<Vec<InventoryEntry>>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty inventory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list(&self) -> Result<Vec<InventoryEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn replace_all(&self, entries: Vec<InventoryEntry>) -> Result<Vec<InventoryEntry>> {
        let mut stored = self.entries.write().await;
        *stored = entries;
        Ok(stored.clone())
    }

    async fn clear(&self) -> Result<Vec<InventoryEntry>> {
        self.entries.write().await.clear();
        Ok(Vec::new())
    }

    async fn contains_product(&self, name: &str) -> Result<bool> {
        Ok(self.entries.read().await.iter().any(|e| e.name == name))
    }
}
