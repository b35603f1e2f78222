use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use order_microservice::application::order_service::OrderService;
use order_microservice::application::product_service::ProductService;
use order_microservice::domain::ports::{CatalogBox, OrderRepositoryBox, ProductStoreBox};
use order_microservice::infrastructure::in_memory::{InMemoryOrderRepository, InMemoryProductStore};
use order_microservice::interfaces::csv::catalog_reader::CatalogReader;
use order_microservice::interfaces::http::{self, AppState};
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Order management HTTP service", long_about = None)]
struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "ORDER_SERVICE_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "ORDER_SERVICE_DB_PATH")]
    db_path: Option<PathBuf>,

    /// CSV file (product_name,package_name,rate) used to seed the catalog
    #[arg(long, env = "ORDER_SERVICE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let (orders, products) = match &cli.db_path {
        Some(db_path) => persistent_services(db_path)?,
        None => in_memory_services(),
    };

    if let Some(catalog_path) = &cli.catalog {
        let file = File::open(catalog_path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to open catalog file {}", catalog_path.display()))?;
        let seed = CatalogReader::new(file)
            .products()
            .into_diagnostic()
            .wrap_err("failed to read catalog file")?;
        let inserted = products
            .seed(seed)
            .await
            .into_diagnostic()
            .wrap_err("failed to seed catalog")?;
        tracing::info!(inserted, path = %catalog_path.display(), "catalog seeded");
    }

    let listener = TcpListener::bind(cli.bind)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to bind {}", cli.bind))?;
    http::serve(listener, AppState::new(orders, products))
        .await
        .into_diagnostic()?;

    Ok(())
}

fn in_memory_services() -> (OrderService, ProductService) {
    let product_store = InMemoryProductStore::new();
    let orders: OrderRepositoryBox = Box::new(InMemoryOrderRepository::new());
    let catalog: CatalogBox = Box::new(product_store.clone());
    let products: ProductStoreBox = Box::new(product_store);

    (OrderService::new(orders, catalog), ProductService::new(products))
}

#[cfg(feature = "storage-rocksdb")]
fn persistent_services(db_path: &Path) -> Result<(OrderService, ProductService)> {
    use order_microservice::infrastructure::rocksdb::RocksDBStore;

    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    tracing::info!(path = %db_path.display(), "using RocksDB storage");

    let orders: OrderRepositoryBox = Box::new(store.clone());
    let catalog: CatalogBox = Box::new(store.clone());
    let products: ProductStoreBox = Box::new(store);

    Ok((OrderService::new(orders, catalog), ProductService::new(products)))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn persistent_services(db_path: &Path) -> Result<(OrderService, ProductService)> {
    tracing::warn!(
        path = %db_path.display(),
        "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(in_memory_services())
}
