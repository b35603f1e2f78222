use super::order::Order;
use super::product::{NewProduct, Product};
use crate::error::Result;
use async_trait::async_trait;

/// Persistent storage for orders.
///
/// Implementations must make `save` and `update` atomic with respect to each
/// other: a duplicate order number or a stale `expected_version` is reported as
/// [`ServiceError::Conflict`](crate::error::ServiceError::Conflict).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save(&self, order: Order) -> Result<Order>;
    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>>;
    /// Replaces the stored order if its version still equals `expected_version`.
    /// The stored copy gets `expected_version + 1`.
    async fn update(&self, order: Order, expected_version: u64) -> Result<Order>;
    async fn all(&self) -> Result<Vec<Order>>;
}

/// Read-only existence checks against the product catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn exists(&self, package_name: &str, product_name: &str) -> Result<bool>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Assigns the next id. Rejects a duplicate product name with a conflict.
    async fn insert(&self, product: NewProduct) -> Result<Product>;
    async fn get(&self, id: u64) -> Result<Option<Product>>;
    async fn find_by_name(&self, product_name: &str) -> Result<Option<Product>>;
    /// Returns `None` when no product with that id exists.
    async fn update(&self, product: Product) -> Result<Option<Product>>;
    async fn delete(&self, id: u64) -> Result<bool>;
    async fn all(&self) -> Result<Vec<Product>>;
}

pub type OrderRepositoryBox = Box<dyn OrderRepository>;
pub type CatalogBox = Box<dyn Catalog>;
pub type ProductStoreBox = Box<dyn ProductStore>;
