use super::validator::validate_product_request;
use crate::domain::pagination::{Page, PageRequest, SortDirection, paginate};
use crate::domain::ports::ProductStoreBox;
use crate::domain::product::{Product, ProductRequest};
use crate::error::{Result, ServiceError};
use chrono::Utc;

pub const PRODUCT_SORT_FIELDS: [&str; 4] = ["id", "productName", "createdAt", "updatedAt"];

/// Catalog maintenance: the write side behind the read-only `Catalog` port.
pub struct ProductService {
    products: ProductStoreBox,
}

impl ProductService {
    pub fn new(products: ProductStoreBox) -> Self {
        Self { products }
    }

    pub async fn save(&self, request: ProductRequest) -> Result<Product> {
        let errors = validate_product_request(&request);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let product = self.products.insert(request.into_new_product()).await?;
        tracing::info!(id = product.id, product_name = %product.product_name, "product saved");
        Ok(product)
    }

    pub async fn find_by_name(&self, product_name: &str) -> Result<Product> {
        self.products
            .find_by_name(product_name.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("productName", product_name.trim()))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Product>> {
        self.products.all().await
    }

    pub async fn fetch_paginated(&self, request: &PageRequest) -> Result<Page<Product>> {
        let errors = request.validate(&PRODUCT_SORT_FIELDS);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let direction = request.direction().unwrap_or(SortDirection::Asc);

        let mut products = self.products.all().await?;
        products.sort_by(|a, b| {
            let ordering = match request.sort_by.as_str() {
                "productName" => a.product_name.cmp(&b.product_name),
                "createdAt" => a.created_at.cmp(&b.created_at),
                "updatedAt" => a.updated_at.cmp(&b.updated_at),
                _ => a.id.cmp(&b.id),
            };
            direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
        });
        Ok(paginate(products, request))
    }

    /// Replaces name and packages of an existing product.
    pub async fn update_product(&self, id: u64, request: ProductRequest) -> Result<Product> {
        let errors = validate_product_request(&request);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let existing = self
            .products
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("id", id.to_string()))?;

        let replacement = request.into_new_product();
        let product = Product {
            id,
            product_name: replacement.product_name,
            packages: replacement.packages,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        let updated = self
            .products
            .update(product)
            .await?
            .ok_or_else(|| ServiceError::not_found("id", id.to_string()))?;
        tracing::info!(id, product_name = %updated.product_name, "product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: u64) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(ServiceError::not_found("id", id.to_string()));
        }
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// Loads seed products, skipping names already in the catalog.
    /// Returns how many products were inserted.
    pub async fn seed(&self, products: Vec<ProductRequest>) -> Result<usize> {
        let mut inserted = 0;
        for request in products {
            if self
                .products
                .find_by_name(request.product_name.trim())
                .await?
                .is_some()
            {
                tracing::debug!(
                    product_name = %request.product_name,
                    "catalog entry already present"
                );
                continue;
            }
            self.save(request).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
