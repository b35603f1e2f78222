use super::correlation::CorrelationId;
use super::{AppState, bad_request, error_response, ok, parse_body};
use crate::domain::pagination::PageRequest;
use crate::domain::product::ProductRequest;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

/// Either a lookup by name or a page request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    pub product_name: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl ProductQuery {
    fn page_request(self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            size: self.size.unwrap_or(defaults.size),
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            sort_dir: self.sort_dir.unwrap_or(defaults.sort_dir),
        }
    }
}

/// GET /api/v1/product?productName= or ?page=&size=&sortBy=&sortDir=
pub async fn get_products(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request("query", rejection.body_text(), &correlation_id),
    };

    if let Some(product_name) = query.product_name.as_deref() {
        return match state.products.find_by_name(product_name).await {
            Ok(product) => ok(product, &correlation_id),
            Err(err) => error_response(err, &correlation_id),
        };
    }

    match state.products.fetch_paginated(&query.page_request()).await {
        Ok(page) => ok(page, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// GET /api/v1/product/ returns the bare product list.
pub async fn list_all_products(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
) -> Response {
    match state.products.fetch_all().await {
        Ok(products) => Json(products).into_response(),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// POST /api/v1/product
pub async fn save_product(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    body: Bytes,
) -> Response {
    let request: ProductRequest = match parse_body(&body, &correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.products.save(request).await {
        Ok(product) => ok(product, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// PUT /api/v1/product/{id}/edit
pub async fn update_product(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request("id", rejection.body_text(), &correlation_id),
    };
    let request: ProductRequest = match parse_body(&body, &correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.products.update_product(id, request).await {
        Ok(product) => ok(product, &correlation_id),
        Err(err) => error_response(err, &correlation_id),
    }
}

/// DELETE /api/v1/product/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request("id", rejection.body_text(), &correlation_id),
    };

    match state.products.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err, &correlation_id),
    }
}
