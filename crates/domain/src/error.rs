//! Domain error types.

use catalog_store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog and inventory operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request shape or one of its values is malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The referenced product does not exist.
    #[error("Product \"{0}\" not found")]
    ProductNotFound(String),

    /// A new product would reuse an existing name.
    #[error("product name already exists")]
    ProductExists(String),

    /// A rename targets a name another product already uses.
    #[error("Product with name \"{0}\" already exists")]
    DuplicateProduct(String),

    /// The product is still referenced by an inventory entry.
    #[error("Cannot delete product \"{0}\" as it exists in inventory")]
    ProductInInventory(String),

    /// An inventory entry references a product that does not exist.
    #[error("Some of the inventory items are missing in the products list")]
    UnknownProduct(String),

    /// Two inventory entries reference the same product.
    #[error("Inventory contains duplicate products")]
    DuplicateEntries(String),

    /// An error occurred in the underlying store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Short machine-readable label, used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput(_) => "invalid_input",
            CatalogError::ProductNotFound(_) => "not_found",
            CatalogError::ProductExists(_) => "product_exists",
            CatalogError::DuplicateProduct(_) => "duplicate_product",
            CatalogError::ProductInInventory(_) => "product_in_inventory",
            CatalogError::UnknownProduct(_) => "unknown_product",
            CatalogError::DuplicateEntries(_) => "duplicate_entries",
            CatalogError::Store(_) => "store",
        }
    }
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
