//! Shared types for the store inventory system.

pub mod types;

pub use types::{InventoryEntry, MAX_PRODUCT_NAME_LEN, MIN_QUANTITY, Product};
