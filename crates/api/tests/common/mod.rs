#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use fuelbook_api::{AppState, create_router};
use fuelbook_shared::AppConfig;
use fuelbook_shared::config::ServerConfig;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub fn app() -> Router {
    let config = AppConfig {
        server: ServerConfig::default(),
        reconciliation: fuelbook_shared::ReconciliationConfig::default(),
    };
    create_router(AppState::new(&config))
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn actor(name: &str) -> Value {
    json!({ "id": Uuid::now_v7(), "name": name })
}

/// Imports a one-attendant diesel shift and returns its id.
pub async fn import_shift(app: &Router, litres: &str, amount: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/shifts",
        Some(json!({
            "actor": actor("importer"),
            "station_id": Uuid::now_v7(),
            "opened_at": "2026-01-10T06:00:00Z",
            "closed_at": "2026-01-10T14:00:00Z",
            "automation_sales": [{
                "fuel": "MOTORIN",
                "pump": 1,
                "nozzle": 1,
                "quantity": litres,
                "unit_price": "40",
                "amount": amount,
                "sold_at": "2026-01-10T07:00:00Z",
                "attendant": "A1"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

pub async fn put_slip(app: &Router, shift: &str, cash: &str) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/api/v1/shifts/{shift}/cash-slips/A1"),
        Some(json!({ "cash": cash })),
    )
    .await
}

pub async fn record_invoice(app: &Router, fuel: &str, number: &str, quantity: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/stock/{fuel}/invoices"),
        Some(json!({
            "invoice_number": number,
            "invoice_date": "2026-01-02",
            "quantity": quantity
        })),
    )
    .await
}
