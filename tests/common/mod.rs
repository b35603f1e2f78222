#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use order_microservice::application::order_service::OrderService;
use order_microservice::application::product_service::ProductService;
use order_microservice::domain::order::{OrderItemRequest, OrderRequest};
use order_microservice::domain::ports::{CatalogBox, OrderRepositoryBox, ProductStoreBox};
use order_microservice::domain::product::{PackageRequest, ProductRequest};
use order_microservice::infrastructure::in_memory::{InMemoryOrderRepository, InMemoryProductStore};
use order_microservice::interfaces::http::{AppState, router};
use rand::Rng;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

pub const PRODUCTS: [(&str, &str); 3] = [("Widget", "P1"), ("Widget", "P2"), ("Gadget", "P1")];

pub fn widget_catalog() -> Vec<ProductRequest> {
    vec![
        ProductRequest {
            product_name: "Widget".to_string(),
            packages: vec![
                PackageRequest {
                    package_name: "P1".to_string(),
                    rate: Some(Decimal::new(100, 1)),
                },
                PackageRequest {
                    package_name: "P2".to_string(),
                    rate: Some(Decimal::new(255, 1)),
                },
            ],
        },
        ProductRequest {
            product_name: "Gadget".to_string(),
            packages: vec![PackageRequest {
                package_name: "P1".to_string(),
                rate: Some(Decimal::new(475, 2)),
            }],
        },
    ]
}

/// Builds both services over fresh in-memory stores and seeds the catalog.
pub async fn services() -> (OrderService, ProductService) {
    let product_store = InMemoryProductStore::new();
    let orders: OrderRepositoryBox = Box::new(InMemoryOrderRepository::new());
    let catalog: CatalogBox = Box::new(product_store.clone());
    let products: ProductStoreBox = Box::new(product_store);

    let order_service = OrderService::new(orders, catalog);
    let product_service = ProductService::new(products);
    product_service
        .seed(widget_catalog())
        .await
        .expect("Failed to seed catalog");

    (order_service, product_service)
}

pub async fn app() -> Router {
    let (orders, products) = services().await;
    router(AppState::new(orders, products))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    raw(method, uri, body.to_string())
}

pub fn raw(method: &str, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("Failed to build request")
}

/// A random order whose items all exist in [`widget_catalog`].
pub fn random_valid_order(rng: &mut impl Rng, order_number: String) -> OrderRequest {
    let item_count = rng.gen_range(1..=5);
    let items: Vec<OrderItemRequest> = (0..item_count)
        .map(|_| {
            let (product_name, package_name) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            OrderItemRequest {
                package_name: package_name.to_string(),
                product_name: product_name.to_string(),
                product_variant_name: None,
                amount: Some(Decimal::new(rng.gen_range(0..100_000), 2)),
            }
        })
        .collect();
    let total_amount = if rng.gen_bool(0.5) {
        Some(items.iter().filter_map(|item| item.amount).sum())
    } else {
        None
    };

    OrderRequest {
        order_number,
        package_name: None,
        items,
        total_amount,
    }
}
