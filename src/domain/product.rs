use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable package of a product, e.g. a monthly plan.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub package_name: String,
    pub rate: Decimal,
}

/// A catalog entry. Product names are unique within the catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub product_name: String,
    pub packages: Vec<Package>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn has_package(&self, package_name: &str) -> bool {
        self.packages
            .iter()
            .any(|package| package.package_name == package_name)
    }
}

/// A product that has not been assigned an id yet.
#[derive(Debug, PartialEq, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub packages: Vec<Package>,
}

/// Incoming create/update payload for a product.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRequest {
    pub product_name: String,
    pub packages: Vec<PackageRequest>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageRequest {
    pub package_name: String,
    pub rate: Option<Decimal>,
}

impl ProductRequest {
    /// Normalizes an already validated request.
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            product_name: self.product_name.trim().to_string(),
            packages: self
                .packages
                .into_iter()
                .map(|package| Package {
                    package_name: package.package_name.trim().to_string(),
                    rate: package.rate.unwrap_or(Decimal::ZERO),
                })
                .collect(),
        }
    }
}
