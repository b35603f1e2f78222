use crate::domain::order::{OrderRequest, OrderStatus, UpdateOrderStatusRequest};
use crate::domain::ports::{Catalog, OrderRepository};
use crate::domain::product::ProductRequest;
use crate::domain::validation::{ErrorResponse, is_blank};
use crate::error::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Request-scoped validator for order payloads.
///
/// Checks never short-circuit: every rule runs and every failure is recorded,
/// so a single response can list all problems. A validator is built per
/// request and carries that request's correlation id. Collaborator failures
/// (catalog or repository I/O) are not validation errors and propagate as `Err`.
pub struct OrderValidator<'a> {
    correlation_id: String,
    catalog: &'a dyn Catalog,
    orders: &'a dyn OrderRepository,
    errors: Vec<ErrorResponse>,
}

impl<'a> OrderValidator<'a> {
    pub fn new(
        correlation_id: impl Into<String>,
        catalog: &'a dyn Catalog,
        orders: &'a dyn OrderRepository,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            catalog,
            orders,
            errors: Vec::new(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Errors recorded by the last `validate_*` call, in check order.
    pub fn errors(&self) -> &[ErrorResponse] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorResponse> {
        self.errors
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ErrorResponse::new(field, message));
    }

    /// Structural checks first, then catalog lookups for the items that passed
    /// them, then the total.
    pub async fn validate_create_request(&mut self, order: &OrderRequest) -> Result<bool> {
        self.errors.clear();

        if is_blank(&order.order_number) {
            self.reject("orderNumber", "orderNumber must not be blank");
        }

        if order.items.is_empty() {
            self.reject("items", "order must contain at least one item");
        }

        let mut resolvable = Vec::with_capacity(order.items.len());
        for (index, item) in order.items.iter().enumerate() {
            let mut well_formed = true;
            if is_blank(&item.package_name) {
                self.reject(
                    "packageName",
                    format!("items[{}].packageName must not be blank", index),
                );
                well_formed = false;
            }
            if is_blank(&item.product_name) {
                self.reject(
                    "productName",
                    format!("items[{}].productName must not be blank", index),
                );
                well_formed = false;
            }
            match item.amount {
                None => self.reject("amount", format!("items[{}].amount is required", index)),
                Some(amount) if amount < Decimal::ZERO => self.reject(
                    "amount",
                    format!("items[{}].amount must not be negative, got {}", index, amount),
                ),
                Some(_) => {}
            }
            if well_formed {
                resolvable.push((index, item.package_name.trim(), item.product_name.trim()));
            }
        }

        for (index, package_name, product_name) in resolvable {
            if !self.catalog.exists(package_name, product_name).await? {
                self.reject(
                    "productName",
                    format!(
                        "items[{}]: product '{}' with package '{}' does not exist in the catalog",
                        index, product_name, package_name
                    ),
                );
            }
        }

        if let Some(total) = order.total_amount {
            let sum: Decimal = order.items.iter().filter_map(|item| item.amount).sum();
            if total != sum {
                self.reject(
                    "totalAmount",
                    format!(
                        "totalAmount {} does not match the sum of item amounts {}",
                        total, sum
                    ),
                );
            }
        }

        tracing::debug!(
            correlation_id = %self.correlation_id,
            errors = self.errors.len(),
            "validated create-order request"
        );
        Ok(self.errors.is_empty())
    }

    /// Checks the order number resolves, the status is recognized, and the
    /// transition from the stored status is legal.
    pub async fn validate_update_request(
        &mut self,
        request: &UpdateOrderStatusRequest,
        order_number: &str,
    ) -> Result<bool> {
        self.errors.clear();

        let current = if is_blank(order_number) {
            self.reject("orderNumber", "orderNumber must not be blank");
            None
        } else {
            let found = self.orders.find_by_order_number(order_number.trim()).await?;
            if found.is_none() {
                self.reject(
                    "orderNumber",
                    format!("no order found with orderNumber '{}'", order_number.trim()),
                );
            }
            found.map(|order| order.status)
        };

        let requested = if is_blank(&request.status) {
            self.reject("status", "status must not be blank");
            None
        } else {
            match request.status.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(message) => {
                    self.reject("status", message);
                    None
                }
            }
        };

        if let (Some(current), Some(requested)) = (current, requested)
            && !current.can_transition_to(requested)
        {
            self.reject(
                "status",
                format!(
                    "illegal status transition from {} to {}",
                    current, requested
                ),
            );
        }

        tracing::debug!(
            correlation_id = %self.correlation_id,
            order_number,
            errors = self.errors.len(),
            "validated update-status request"
        );
        Ok(self.errors.is_empty())
    }
}

/// Structural checks for a product create/update payload.
pub fn validate_product_request(request: &ProductRequest) -> Vec<ErrorResponse> {
    let mut errors = Vec::new();
    if is_blank(&request.product_name) {
        errors.push(ErrorResponse::new(
            "productName",
            "productName must not be blank",
        ));
    }

    let mut seen = HashSet::new();
    for (index, package) in request.packages.iter().enumerate() {
        if is_blank(&package.package_name) {
            errors.push(ErrorResponse::new(
                "packageName",
                format!("packages[{}].packageName must not be blank", index),
            ));
        } else if !seen.insert(package.package_name.trim()) {
            errors.push(ErrorResponse::new(
                "packageName",
                format!(
                    "packages[{}].packageName '{}' is duplicated",
                    index,
                    package.package_name.trim()
                ),
            ));
        }
        match package.rate {
            None => errors.push(ErrorResponse::new(
                "rate",
                format!("packages[{}].rate is required", index),
            )),
            Some(rate) if rate < Decimal::ZERO => errors.push(ErrorResponse::new(
                "rate",
                format!("packages[{}].rate must not be negative, got {}", index, rate),
            )),
            Some(_) => {}
        }
    }
    errors
}
