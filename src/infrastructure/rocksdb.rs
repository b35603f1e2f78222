use crate::domain::order::Order;
use crate::domain::ports::{Catalog, OrderRepository, ProductStore};
use crate::domain::product::{NewProduct, Product};
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing orders, keyed by order number.
pub const CF_ORDERS: &str = "orders";
/// Column Family for storing products, keyed by big-endian id.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for bookkeeping such as the product id sequence.
pub const CF_META: &str = "meta";

const PRODUCT_SEQUENCE_KEY: &[u8] = b"product_seq";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Order` and `Product` entities using separate
/// Column Families. Writes that check existing state first (duplicate checks,
/// version checks, id allocation) are serialized through `write_lock`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ORDERS, CF_PRODUCTS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            ServiceError::transient(std::io::Error::other(format!(
                "{} column family not found",
                name
            )))
        })
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(serde_json::from_slice(&value)?);
        }
        Ok(values)
    }

    fn last_product_id(&self) -> Result<u64> {
        Ok(self.read(CF_META, PRODUCT_SEQUENCE_KEY)?.unwrap_or(0))
    }

    fn product_name_taken(&self, product_name: &str, except: Option<u64>) -> Result<bool> {
        Ok(self
            .scan::<Product>(CF_PRODUCTS)?
            .iter()
            .any(|p| p.product_name == product_name && Some(p.id) != except))
    }
}

#[async_trait]
impl OrderRepository for RocksDBStore {
    async fn save(&self, order: Order) -> Result<Order> {
        let _guard = self.write_lock.lock().await;
        let key = order.order_number.as_bytes();
        if self.read::<Order>(CF_ORDERS, key)?.is_some() {
            return Err(ServiceError::conflict(
                "orderNumber",
                format!("order number '{}' already exists", order.order_number),
            ));
        }
        self.write(CF_ORDERS, key, &order)?;
        Ok(order)
    }

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>> {
        self.read(CF_ORDERS, order_number.as_bytes())
    }

    async fn update(&self, mut order: Order, expected_version: u64) -> Result<Order> {
        let _guard = self.write_lock.lock().await;
        let stored: Order = self
            .read(CF_ORDERS, order.order_number.as_bytes())?
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
        self.write(CF_ORDERS, order.order_number.as_bytes(), &order)?;
        Ok(order)
    }

    async fn all(&self) -> Result<Vec<Order>> {
        self.scan(CF_ORDERS)
    }
}

#[async_trait]
impl ProductStore for RocksDBStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let _guard = self.write_lock.lock().await;
        if self.product_name_taken(&product.product_name, None)? {
            return Err(ServiceError::conflict(
                "productName",
                format!("product '{}' already exists", product.product_name),
            ));
        }
        let now = Utc::now();
        let stored = Product {
            id: self.last_product_id()? + 1,
            product_name: product.product_name,
            packages: product.packages,
            created_at: now,
            updated_at: now,
        };

        // The sequence only advances together with the row it was used for.
        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_META)?,
            PRODUCT_SEQUENCE_KEY,
            serde_json::to_vec(&stored.id)?,
        );
        batch.put_cf(
            self.cf(CF_PRODUCTS)?,
            stored.id.to_be_bytes(),
            serde_json::to_vec(&stored)?,
        );
        self.db.write(batch)?;
        Ok(stored)
    }

    async fn get(&self, id: u64) -> Result<Option<Product>> {
        self.read(CF_PRODUCTS, &id.to_be_bytes())
    }

    async fn find_by_name(&self, product_name: &str) -> Result<Option<Product>> {
        Ok(self
            .scan::<Product>(CF_PRODUCTS)?
            .into_iter()
            .find(|p| p.product_name == product_name))
    }

    async fn update(&self, product: Product) -> Result<Option<Product>> {
        let _guard = self.write_lock.lock().await;
        let key = product.id.to_be_bytes();
        if self.read::<Product>(CF_PRODUCTS, &key)?.is_none() {
            return Ok(None);
        }
        if self.product_name_taken(&product.product_name, Some(product.id))? {
            return Err(ServiceError::conflict(
                "productName",
                format!("product '{}' already exists", product.product_name),
            ));
        }
        self.write(CF_PRODUCTS, &key, &product)?;
        Ok(Some(product))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let key = id.to_be_bytes();
        if self.read::<Product>(CF_PRODUCTS, &key)?.is_none() {
            return Ok(false);
        }
        let cf = self.cf(CF_PRODUCTS)?;
        self.db.delete_cf(cf, key)?;
        Ok(true)
    }

    async fn all(&self) -> Result<Vec<Product>> {
        // Big-endian keys iterate in id order.
        self.scan(CF_PRODUCTS)
    }
}

#[async_trait]
impl Catalog for RocksDBStore {
    async fn exists(&self, package_name: &str, product_name: &str) -> Result<bool> {
        Ok(ProductStore::find_by_name(self, product_name)
            .await?
            .is_some_and(|p| p.has_package(package_name)))
    }
}
