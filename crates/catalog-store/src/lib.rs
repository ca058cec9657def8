pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{InventoryEntry, Product};
pub use error::{Result, StoreError};
pub use memory::{InMemoryInventoryStore, InMemoryProductStore};
pub use postgres::{InventoryLayout, PostgresInventoryStore, PostgresProductStore};
pub use store::{InventoryStore, ProductStore};
