use super::validator::OrderValidator;
use crate::domain::order::{Order, OrderRequest, OrderStatus, UpdateOrderStatusRequest};
use crate::domain::pagination::{Page, PageRequest, SortDirection, paginate};
use crate::domain::ports::{CatalogBox, OrderRepositoryBox};
use crate::domain::validation::ErrorResponse;
use crate::error::{Result, ServiceError};
use chrono::Utc;

pub const ORDER_SORT_FIELDS: [&str; 6] = [
    "id",
    "orderNumber",
    "status",
    "totalAmount",
    "createdAt",
    "updatedAt",
];

/// Orchestrates order validation and persistence.
///
/// `accept_order` and `update_order_status` expect their input to have passed
/// the matching [`OrderValidator`] check first. The update path still re-reads
/// and re-checks the order because validation and the write are not atomic;
/// the repository's version check decides the race.
pub struct OrderService {
    orders: OrderRepositoryBox,
    catalog: CatalogBox,
}

impl OrderService {
    pub fn new(orders: OrderRepositoryBox, catalog: CatalogBox) -> Self {
        Self { orders, catalog }
    }

    /// A fresh validator for one request, bound to this service's collaborators.
    pub fn validator(&self, correlation_id: impl Into<String>) -> OrderValidator<'_> {
        OrderValidator::new(correlation_id, self.catalog.as_ref(), self.orders.as_ref())
    }

    /// Stores a validated order with status `CREATED`.
    ///
    /// Fails with a conflict when the order number is already taken.
    pub async fn accept_order(&self, request: &OrderRequest) -> Result<Order> {
        let order = Order::from_request(request, Utc::now());
        let stored = self.orders.save(order).await?;
        tracing::info!(
            order_number = %stored.order_number,
            total_amount = %stored.total_amount,
            items = stored.items.len(),
            "order accepted"
        );
        Ok(stored)
    }

    pub async fn search_an_order(&self, order_number: &str) -> Result<Order> {
        self.orders
            .find_by_order_number(order_number.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("orderNumber", order_number.trim()))
    }

    /// Applies a status change that the validator already accepted.
    pub async fn update_order_status(
        &self,
        order_number: &str,
        request: &UpdateOrderStatusRequest,
    ) -> Result<Order> {
        let requested: OrderStatus = request.status.parse().map_err(|message: String| {
            ServiceError::Validation(vec![ErrorResponse::new("status", message)])
        })?;

        let mut order = self.search_an_order(order_number).await?;
        let previous = order.status;
        if !previous.can_transition_to(requested) {
            return Err(ServiceError::conflict(
                "status",
                format!(
                    "illegal status transition from {} to {}: order changed concurrently",
                    previous, requested
                ),
            ));
        }

        let expected_version = order.version;
        order.status = requested;
        order.updated_at = Utc::now();
        let updated = self.orders.update(order, expected_version).await?;

        tracing::info!(
            order_number = %updated.order_number,
            from = %previous,
            to = %updated.status,
            comment = request.comment.as_deref().unwrap_or(""),
            "order status updated"
        );
        Ok(updated)
    }

    pub async fn fetch_paginated(&self, request: &PageRequest) -> Result<Page<Order>> {
        let errors = request.validate(&ORDER_SORT_FIELDS);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let direction = request.direction().unwrap_or(SortDirection::Asc);

        let mut orders = self.orders.all().await?;
        orders.sort_by(|a, b| {
            let ordering = match request.sort_by.as_str() {
                "status" => a.status.cmp(&b.status),
                "totalAmount" => a.total_amount.cmp(&b.total_amount),
                "createdAt" => a.created_at.cmp(&b.created_at),
                "updatedAt" => a.updated_at.cmp(&b.updated_at),
                _ => a.order_number.cmp(&b.order_number),
            };
            direction.apply(ordering.then_with(|| a.order_number.cmp(&b.order_number)))
        });
        Ok(paginate(orders, request))
    }
}
