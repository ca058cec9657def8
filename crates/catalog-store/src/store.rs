use async_trait::async_trait;

use crate::{InventoryEntry, Product, Result};

/// Storage for the product catalog.
///
/// Implementations must keep product names unique at all times, even when
/// a caller skips the existence checks done by the service layer.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns every product.
    ///
    /// Ordering is stable for the lifetime of the store but otherwise
    /// unspecified.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Persists a new product.
    ///
    /// Fails with `Duplicate` if a product with this exact name exists.
    async fn create(&self, name: &str) -> Result<Product>;

    /// Renames a product in place.
    ///
    /// Fails with `NotFound` if `old_name` is absent, or with `Duplicate`
    /// if `new_name` differs from `old_name` and is already taken.
    async fn rename(&self, old_name: &str, new_name: &str) -> Result<Product>;

    /// Removes a product. Fails with `NotFound` if absent.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Returns true if a product with this exact name exists.
    async fn exists(&self, name: &str) -> Result<bool>;
}

/// Storage for the single current inventory snapshot.
///
/// No per-entry validation happens here; callers validate first.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Returns the current entries in save order.
    async fn list(&self) -> Result<Vec<InventoryEntry>>;

    /// Discards the previous snapshot and stores `entries` verbatim.
    async fn replace_all(&self, entries: Vec<InventoryEntry>) -> Result<Vec<InventoryEntry>>;

    /// Empties the snapshot.
    async fn clear(&self) -> Result<Vec<InventoryEntry>>;

    /// Returns true if any stored entry references `name`.
    async fn contains_product(&self, name: &str) -> Result<bool>;
}
