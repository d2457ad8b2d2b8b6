use thiserror::Error;

use crate::db_types::Product;

/// The engine's window onto the product catalog: batched reads for availability checks, and
/// conditional stock adjustments. Stock writes are expressed as deltas guarded at the storage
/// layer (`stock = stock - q WHERE stock >= q`), never as read-modify-write.
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Fetches all products matching the given ids in one batched read. Ids with no matching
    /// product are simply absent from the result; callers decide whether that is an error.
    async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, CatalogError>;

    /// Fetches a single product, failing with [`CatalogError::ProductNotFound`] if absent.
    async fn fetch_product(&self, product_id: &str) -> Result<Product, CatalogError>;

    /// Decrements stock by `quantity` iff at least `quantity` units remain, as a single
    /// conditional update. Reports [`CatalogError::InsufficientStock`] distinctly so callers can
    /// treat it as a soft condition.
    async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError>;

    /// Adds `quantity` units back to stock, e.g. on order cancellation.
    async fn restore_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("The requested product {0} does not exist")]
    ProductNotFound(String),
    #[error("Insufficient stock for product {product_id}. Available: {available}, requested: {requested}")]
    InsufficientStock { product_id: String, available: i64, requested: i64 },
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}
