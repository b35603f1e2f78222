mod common;

use axum::http::StatusCode;
use common::{app, get, json, raw, send};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::str::FromStr;

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn widget_order(order_number: &str) -> Value {
    json!({
        "orderNumber": order_number,
        "items": [
            { "packageName": "P1", "productName": "Widget", "amount": 10.0 }
        ]
    })
}

#[tokio::test]
async fn test_accept_valid_order() {
    let app = app().await;

    let response = send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["statusCode"], 200);
    assert_eq!(response.body["statusText"], "200 OK");
    assert_eq!(response.body["data"]["orderNumber"], "O-1");
    assert_eq!(response.body["data"]["status"], "CREATED");
    assert_eq!(decimal(&response.body["data"]["totalAmount"]), dec!(10));
    assert!(response.body.get("errors").is_none());
}

#[tokio::test]
async fn test_empty_product_name_is_rejected() {
    let app = app().await;
    let order = json!({
        "orderNumber": "O-1",
        "items": [
            { "packageName": "P1", "productName": "", "amount": 10.0 }
        ]
    });

    let response = send(&app, json("POST", "/api/v1/order/accept-order", &order)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
    assert_eq!(response.body["errorCount"], 1);
    assert_eq!(response.body["errors"][0]["field"], "productName");
    assert!(response.body.get("data").is_none());
}

#[tokio::test]
async fn test_unknown_catalog_item_is_rejected() {
    let app = app().await;
    let order = json!({
        "orderNumber": "O-1",
        "items": [
            { "packageName": "P9", "productName": "Widget", "amount": 10.0 }
        ]
    });

    let response = send(&app, json("POST", "/api/v1/order/accept-order", &order)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errorCount"], 1);
    assert_eq!(response.body["errors"][0]["field"], "productName");
}

#[tokio::test]
async fn test_multiple_errors_are_reported_together() {
    let app = app().await;
    let order = json!({
        "orderNumber": " ",
        "items": [
            { "packageName": "", "productName": "Widget", "amount": -1 }
        ],
        "totalAmount": 5
    });

    let response = send(&app, json("POST", "/api/v1/order/accept-order", &order)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["orderNumber", "packageName", "amount", "totalAmount"]);
    assert_eq!(response.body["errorCount"], 4);
}

#[tokio::test]
async fn test_duplicate_order_number_conflicts() {
    let app = app().await;
    let first = send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["errors"][0]["field"], "orderNumber");
}

#[tokio::test]
async fn test_illegal_transition_is_rejected() {
    let app = app().await;
    send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;

    let response = send(
        &app,
        json(
            "PUT",
            "/api/v1/order/update-order-status?orderNumber=O-1",
            &json!({ "status": "DELIVERED" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "status");
    let message = response.body["errors"][0]["message"].as_str().unwrap();
    assert!(message.contains("CREATED"));
    assert!(message.contains("DELIVERED"));

    let search = send(&app, get("/api/v1/order/search-order?orderNumber=O-1")).await;
    assert_eq!(search.body["data"]["status"], "CREATED");
}

#[tokio::test]
async fn test_legal_transition_is_applied() {
    let app = app().await;
    send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;

    let response = send(
        &app,
        json(
            "PUT",
            "/api/v1/order/update-order-status?orderNumber=O-1",
            &json!({ "status": "confirmed", "comment": "paid" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "CONFIRMED");
    assert_eq!(response.body["data"]["version"], 1);
}

#[tokio::test]
async fn test_update_of_unknown_order_is_rejected() {
    let app = app().await;

    let response = send(
        &app,
        json(
            "PUT",
            "/api/v1/order/update-order-status?orderNumber=NOPE",
            &json!({ "status": "CONFIRMED" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "orderNumber");
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let app = app().await;
    send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;

    let response = send(
        &app,
        json(
            "PUT",
            "/api/v1/order/update-order-status?orderNumber=O-1",
            &json!({ "status": "LOST" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "status");
}

#[tokio::test]
async fn test_search_missing_order_is_not_found() {
    let app = app().await;

    let response = send(&app, get("/api/v1/order/search-order?orderNumber=X")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["statusCode"], 404);
    assert_eq!(response.body["errors"][0]["field"], "orderNumber");
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let app = app().await;
    send(
        &app,
        json("POST", "/api/v1/order/accept-order", &widget_order("O-1")),
    )
    .await;

    let first = send(&app, get("/api/v1/order/search-order?orderNumber=O-1")).await;
    let second = send(&app, get("/api/v1/order/search-order?orderNumber=O-1")).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"], second.body["data"]);
}

#[tokio::test]
async fn test_malformed_body_returns_failure_envelope() {
    let app = app().await;

    let response = send(
        &app,
        raw("POST", "/api/v1/order/accept-order", "{\"orderNumber\": "),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "body");
    assert_eq!(response.body["errorCount"], 1);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app().await;
    let mut request = get("/api/v1/order/search-order?orderNumber=X");
    request
        .headers_mut()
        .insert("x-request-id", "session-1234".parse().unwrap());

    let response = send(&app, request).await;

    assert_eq!(response.headers["x-request-id"], "session-1234");
    assert_eq!(response.body["correlationId"], "session-1234");
}

#[tokio::test]
async fn test_request_id_is_generated_when_absent() {
    let app = app().await;

    let response = send(&app, get("/api/v1/order/search-order?orderNumber=X")).await;

    let header = response.headers["x-request-id"].to_str().unwrap().to_string();
    assert!(!header.is_empty());
    assert_eq!(response.body["correlationId"], header.as_str());
}

#[tokio::test]
async fn test_list_orders_is_paginated() {
    let app = app().await;
    for number in ["O-3", "O-1", "O-2"] {
        send(
            &app,
            json("POST", "/api/v1/order/accept-order", &widget_order(number)),
        )
        .await;
    }

    let response = send(
        &app,
        get("/api/v1/order?page=0&size=2&sortBy=orderNumber&sortDir=DESC"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let content = response.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["orderNumber"], "O-3");
    assert_eq!(content[1]["orderNumber"], "O-2");
    assert_eq!(response.body["data"]["totalElements"], 3);
    assert_eq!(response.body["data"]["totalPages"], 2);
    assert_eq!(response.body["data"]["last"], false);
}

#[tokio::test]
async fn test_list_orders_rejects_unknown_sort_field() {
    let app = app().await;

    let response = send(&app, get("/api/v1/order?sortBy=colour")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "sortBy");
}
