use crate::domain::order::Order;
use crate::domain::ports::{Catalog, OrderRepository, ProductStore};
use crate::domain::product::{NewProduct, Product};
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order repository.
///
/// Uses `Arc<RwLock<HashMap<String, Order>>>` to allow shared concurrent access.
/// Version checks happen under the write lock, so `update` is a true
/// compare-and-swap.
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new, empty in-memory order repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.order_number) {
            return Err(ServiceError::conflict(
                "orderNumber",
                format!("order number '{}' already exists", order.order_number),
            ));
        }
        orders.insert(order.order_number.clone(), order.clone());
        Ok(order)
    }

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_number).cloned())
    }

    async fn update(&self, mut order: Order, expected_version: u64) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get_mut(&order.order_number)
            .ok_or_else(|| ServiceError::not_found("orderNumber", order.order_number.clone()))?;
        if stored.version != expected_version {
            return Err(ServiceError::conflict(
                "orderNumber",
                format!(
                    "order '{}' was modified concurrently (expected version {}, found {})",
                    order.order_number, expected_version, stored.version
                ),
            ));
        }
        order.version = expected_version + 1;
        *stored = order.clone();
        Ok(order)
    }

    async fn all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }
}

#[derive(Default)]
struct ProductTable {
    next_id: u64,
    products: HashMap<u64, Product>,
}

impl ProductTable {
    fn name_taken(&self, product_name: &str, except: Option<u64>) -> bool {
        self.products
            .values()
            .any(|p| p.product_name == product_name && Some(p.id) != except)
    }
}

/// A thread-safe in-memory product catalog.
///
/// Implements both [`ProductStore`] and [`Catalog`]; clones share the same table.
#[derive(Default, Clone)]
pub struct InMemoryProductStore {
    table: Arc<RwLock<ProductTable>>,
}

impl InMemoryProductStore {
    /// Creates a new, empty in-memory product store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut table = self.table.write().await;
        if table.name_taken(&product.product_name, None) {
            return Err(ServiceError::conflict(
                "productName",
                format!("product '{}' already exists", product.product_name),
            ));
        }
        table.next_id += 1;
        let now = Utc::now();
        let stored = Product {
            id: table.next_id,
            product_name: product.product_name,
            packages: product.packages,
            created_at: now,
            updated_at: now,
        };
        table.products.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: u64) -> Result<Option<Product>> {
        let table = self.table.read().await;
        Ok(table.products.get(&id).cloned())
    }

    async fn find_by_name(&self, product_name: &str) -> Result<Option<Product>> {
        let table = self.table.read().await;
        Ok(table
            .products
            .values()
            .find(|p| p.product_name == product_name)
            .cloned())
    }

    async fn update(&self, product: Product) -> Result<Option<Product>> {
        let mut table = self.table.write().await;
        if !table.products.contains_key(&product.id) {
            return Ok(None);
        }
        if table.name_taken(&product.product_name, Some(product.id)) {
            return Err(ServiceError::conflict(
                "productName",
                format!("product '{}' already exists", product.product_name),
            ));
        }
        table.products.insert(product.id, product.clone());
        Ok(Some(product))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut table = self.table.write().await;
        Ok(table.products.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<Product>> {
        let table = self.table.read().await;
        let mut products: Vec<Product> = table.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }
}

#[async_trait]
impl Catalog for InMemoryProductStore {
    async fn exists(&self, package_name: &str, product_name: &str) -> Result<bool> {
        let table = self.table.read().await;
        Ok(table
            .products
            .values()
            .any(|p| p.product_name == product_name && p.has_package(package_name)))
    }
}
