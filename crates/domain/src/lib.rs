//! Domain layer for the store inventory system.
//!
//! This crate provides:
//! - `CatalogService`, which enforces the rules tying inventory to products
//! - Input validation for product names and inventory entries
//! - `CatalogError`, the error taxonomy surfaced to the API layer

pub mod error;
pub mod service;
pub mod validation;

pub use common::{InventoryEntry, Product};
pub use error::{CatalogError, Result};
pub use service::CatalogService;
