// Service exports
pub mod cache;
pub mod catalog;
pub mod postgres;
pub mod rest;

pub use cache::{CacheManager, CacheKey, CacheError, CacheStats};
pub use catalog::{VenueCatalog, MemoryCatalog, CatalogError, MemoryCatalogError};
pub use postgres::{PostgresClient, PostgresError};
pub use rest::{RestCatalogClient, RestError};
