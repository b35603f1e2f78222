use crate::domain::product::{PackageRequest, ProductRequest};
use crate::error::{Result, ServiceError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a catalog seed file: a single package of a product.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CatalogRow {
    pub product_name: String,
    pub package_name: String,
    pub rate: Decimal,
}

/// Reads catalog seed rows from a CSV source.
///
/// Expects the header `product_name,package_name,rate`. Whitespace around
/// fields is trimmed.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    /// Creates a new `CatalogReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn rows(self) -> impl Iterator<Item = Result<CatalogRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ServiceError::from))
    }

    /// Reads every row and groups packages under their product, keeping the
    /// order in which products first appear. Fails on the first malformed row.
    pub fn products(self) -> Result<Vec<ProductRequest>> {
        let mut products: Vec<ProductRequest> = Vec::new();
        for row in self.rows() {
            let row = row?;
            let package = PackageRequest {
                package_name: row.package_name,
                rate: Some(row.rate),
            };
            match products
                .iter_mut()
                .find(|p| p.product_name == row.product_name)
            {
                Some(product) => product.packages.push(package),
                None => products.push(ProductRequest {
                    product_name: row.product_name,
                    packages: vec![package],
                }),
            }
        }
        Ok(products)
    }
}
