use super::correlation::CorrelationId;
use super::envelope::ResponseEnvelope;
use super::{AppState, bad_request, error_response, ok, parse_body};
use crate::domain::order::{Order, OrderRequest, UpdateOrderStatusRequest};
use crate::domain::pagination::PageRequest;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderNumberQuery {
    pub order_number: String,
}

/// POST /api/v1/order/accept-order
pub async fn accept_order(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    body: Bytes,
) -> Response {
    let request: OrderRequest = match parse_body(&body, &correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut validator = state.orders.validator(&correlation_id);
    match validator.validate_create_request(&request).await {
        Ok(true) => {
            tracing::info!(
                %correlation_id,
                order_number = %request.order_number,
                "order is valid"
            );
        }
        Ok(false) => {
            tracing::info!(
                %correlation_id,
                errors = validator.errors().len(),
                "order is not valid"
            );
            return ResponseEnvelope::<Order>::failure(
                StatusCode::BAD_REQUEST,
                validator.into_errors(),
                &correlation_id,
            )
            .into_response();
        }
        Err(err) => return error_response(err, &correlation_id),
    }

    match state.orders.accept_order(&request).await {
        Ok(order) => ok(order, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// GET /api/v1/order/search-order?orderNumber=
pub async fn search_order(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    query: Result<Query<OrderNumberQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request("query", rejection.body_text(), &correlation_id),
    };

    match state.orders.search_an_order(&query.order_number).await {
        Ok(order) => ok(order, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// PUT /api/v1/order/update-order-status?orderNumber=
pub async fn update_order_status(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    query: Result<Query<OrderNumberQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request("query", rejection.body_text(), &correlation_id),
    };
    let request: UpdateOrderStatusRequest = match parse_body(&body, &correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut validator = state.orders.validator(&correlation_id);
    match validator
        .validate_update_request(&request, &query.order_number)
        .await
    {
        Ok(true) => {
            tracing::info!(
                %correlation_id,
                order_number = %query.order_number,
                "status update is valid"
            );
        }
        Ok(false) => {
            tracing::info!(
                %correlation_id,
                errors = validator.errors().len(),
                "status update is not valid"
            );
            return ResponseEnvelope::<Order>::failure(
                StatusCode::BAD_REQUEST,
                validator.into_errors(),
                &correlation_id,
            )
            .into_response();
        }
        Err(err) => return error_response(err, &correlation_id),
    }

    match state
        .orders
        .update_order_status(&query.order_number, &request)
        .await
    {
        Ok(order) => ok(order, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// GET /api/v1/order?page=&size=&sortBy=&sortDir=
pub async fn list_orders(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    let Query(page_request) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request("query", rejection.body_text(), &correlation_id),
    };

    match state.orders.fetch_paginated(&page_request).await {
        Ok(page) => ok(page, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}
