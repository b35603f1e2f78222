//! HTTP surface of the service.
//!
//! Every JSON response, success or failure, is a [`ResponseEnvelope`] carrying
//! the request's [`CorrelationId`]. The only exception is the plain product
//! listing at `GET /api/v1/product/`.

pub mod correlation;
pub mod envelope;
mod orders;
mod products;

use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::domain::validation::ErrorResponse;
use crate::error::ServiceError;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use correlation::{CorrelationId, assign_correlation_id};
use envelope::ResponseEnvelope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(orders: OrderService, products: ProductService) -> Self {
        Self {
            orders: Arc::new(orders),
            products: Arc::new(products),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/order", get(orders::list_orders))
        .route("/api/v1/order/accept-order", post(orders::accept_order))
        .route("/api/v1/order/search-order", get(orders::search_order))
        .route(
            "/api/v1/order/update-order-status",
            put(orders::update_order_status),
        )
        .route(
            "/api/v1/product",
            get(products::get_products).post(products::save_product),
        )
        .route("/api/v1/product/", get(products::list_all_products))
        .route("/api/v1/product/{id}", delete(products::delete_product))
        .route("/api/v1/product/{id}/edit", put(products::update_product))
        .layer(middleware::from_fn(assign_correlation_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(%address, "order service listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Conflict { .. } => StatusCode::CONFLICT,
        ServiceError::Transient(_) | ServiceError::CsvError(_) | ServiceError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn ok<T: Serialize>(data: T, correlation_id: &CorrelationId) -> Response {
    ResponseEnvelope::success(StatusCode::OK, data, correlation_id).into_response()
}

/// Maps a service failure onto a failure envelope.
fn error_response(err: ServiceError, correlation_id: &CorrelationId) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(%correlation_id, %err, "request failed");
    } else {
        tracing::info!(%correlation_id, %err, "request rejected");
    }
    ResponseEnvelope::<()>::failure(status, err.field_errors(), correlation_id).into_response()
}

fn bad_request(
    field: &str,
    message: impl Into<String>,
    correlation_id: &CorrelationId,
) -> Response {
    ResponseEnvelope::<()>::failure(
        StatusCode::BAD_REQUEST,
        vec![ErrorResponse::new(field, message)],
        correlation_id,
    )
    .into_response()
}

/// Parses a JSON body, turning malformed input into a failure envelope
/// instead of the framework's plain-text rejection.
fn parse_body<T: DeserializeOwned>(
    body: &[u8],
    correlation_id: &CorrelationId,
) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(%correlation_id, %err, "malformed request body");
        bad_request("body", format!("malformed JSON body: {}", err), correlation_id)
    })
}
