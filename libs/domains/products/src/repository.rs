use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductId};

/// Data access interface for the catalog resource.
///
/// The production implementation talks HTTP; tests substitute mocks or
/// in-process fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List every product, most recently modified first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Create a product and return it as stored by the catalog
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: ProductId) -> ProductResult<()>;
}
