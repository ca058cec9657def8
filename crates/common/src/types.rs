use serde::{Deserialize, Serialize};

/// Longest accepted product name, in characters, after trimming.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// Smallest quantity an inventory entry may carry.
pub const MIN_QUANTITY: u32 = 1;

/// A named catalog entry.
///
/// The name is the product's identity: inventory entries refer to
/// products by name rather than by an opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
}

impl Product {
    /// Creates a product with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Current stock of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Name of the referenced product.
    pub name: String,
    pub quantity: u32,
}

impl InventoryEntry {
    /// Creates an inventory entry.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}
