use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::ProductId;

pub mod errors;
pub mod product;
pub mod schema;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers. All storage access is
/// serialized through this single pool; the storage engine serializes
/// writes, but no isolation is provided across the read-modify-write
/// sequences used by update and delete.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for product records.
pub trait ProductReader {
    /// List all products, most recently created first.
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    /// List products with an exact category match, same ordering.
    ///
    /// The value is not checked against the taxonomy; an unknown category
    /// simply yields an empty result.
    fn list_products_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier; absence is `None`, not an error.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product records.
pub trait ProductWriter {
    /// Persist a new product, assigning its id and both timestamps.
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Fully replace a product's state, refreshing `updated_at`.
    ///
    /// Returns `None` when no record with the id exists.
    fn update_product(&self, id: ProductId, update: &NewProduct)
    -> RepositoryResult<Option<Product>>;
    /// Remove a product, returning the removed record so the caller can
    /// release its asset. Returns `None` when no record with the id exists.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}
