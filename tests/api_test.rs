//! Router-level tests against the in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use laundry_loop::config::{BookingConfig, PaymentConfig};
use laundry_loop::gateway::{build_router, state::AppState};
use laundry_loop::models::OrderStatus;
use laundry_loop::payment::signature::signature_header;
use laundry_loop::store::{FailPoint, MemoryStore};

const SECRET: &str = "whsec_integration";
const DATE: &str = "2026-10-20";
/// Seeded "Hillcrest", capacity 5
const SMALL_ZONE: i64 = 3;

fn app_with(store: Arc<MemoryStore>, secret: Option<&str>, transactional: bool) -> Router {
    let payment = PaymentConfig {
        webhook_secret: secret.map(String::from),
        tolerance_secs: 300,
    };
    let booking = BookingConfig {
        calendar_url: "https://cal.example.com/pickup".to_string(),
        checkout_url: Some("https://pay.example.com/checkout".to_string()),
    };
    build_router(Arc::new(AppState::new(store, transactional, &payment, booking)))
}

fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::seeded());
    (store.clone(), app_with(store, Some(SECRET), false))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

async fn create(app: &Router, zone_id: i64, express: bool) -> Value {
    let (status, body) = post_json(
        app,
        "/orders",
        json!({"zone_id": zone_id, "pickup_date": DATE, "is_express": express}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn webhook(app: &Router, payload: &Value, signature: Option<String>) -> (StatusCode, Value) {
    let mut req = Request::post("/webhooks/payment-provider")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sig) = signature {
        req = req.header("Stripe-Signature", sig);
    }
    let req = req.body(Body::from(payload.to_string())).unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

fn signed(payload: &Value, secret: &str) -> String {
    signature_header(
        secret,
        chrono::Utc::now().timestamp(),
        payload.to_string().as_bytes(),
    )
    .unwrap()
}

fn checkout_completed(order_id: &str) -> Value {
    json!({
        "id": "evt_test",
        "type": "checkout.session.completed",
        "data": { "object": { "metadata": { "order_id": order_id } } }
    })
}

// ============================================================================
// Zones
// ============================================================================

#[tokio::test]
async fn test_zones_requires_date() {
    let (_, app) = app();
    let (status, body) = get(&app, "/zones").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid date parameter");

    let (status, _) = get(&app, "/zones?date=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/zones?date=next-tuesday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zones_reflect_bookings_and_never_go_negative() {
    let (_, app) = app();
    for _ in 0..7 {
        create(&app, SMALL_ZONE, false).await;
    }

    let (status, body) = get(&app, &format!("/api/zones?date={DATE}")).await;
    assert_eq!(status, StatusCode::OK);
    let zones = body["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 3, "full zones are still listed");

    let small = zones.iter().find(|z| z["id"] == SMALL_ZONE).unwrap();
    assert_eq!(small["orders_count"], 7);
    assert_eq!(small["available_slots"], 0);
    assert_eq!(small["is_available"], false);
    assert_eq!(small["date"], DATE);

    let downtown = zones.iter().find(|z| z["id"] == 1).unwrap();
    assert_eq!(downtown["available_slots"], 20);

    // other dates are unaffected
    let (_, body) = get(&app, "/zones?date=2026-10-21").await;
    let small = body["zones"]
        .as_array()
        .unwrap()
        .iter()
        .find(|z| z["id"] == SMALL_ZONE)
        .unwrap()
        .clone();
    assert_eq!(small["available_slots"], 5);
}

#[tokio::test]
async fn test_zones_store_failure() {
    let (store, app) = app();
    store.fail_on(FailPoint::ListZones);
    let (status, body) = get(&app, &format!("/zones?date={DATE}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch zones");

    store.clear_fail(FailPoint::ListZones);
    store.fail_on(FailPoint::CountOrders);
    let (_, body) = get(&app, &format!("/zones?date={DATE}")).await;
    assert_eq!(body["error"], "Failed to compute availability");
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_sixth_order_in_full_zone_overflows() {
    let (_, app) = app();
    for _ in 0..5 {
        let body = create(&app, SMALL_ZONE, false).await;
        assert_eq!(body["overflow"], false);
        assert_eq!(body["price_cents"], 1000);
    }

    let body = create(&app, SMALL_ZONE, false).await;
    assert_eq!(body["overflow"], true);
    assert_eq!(body["price_cents"], 1300);
    assert_eq!(body["order"]["is_overflow"], true);
    assert_eq!(body["order"]["price_cents"], 1300);
    assert_eq!(body["order"]["status"], "created");
}

#[tokio::test]
async fn test_express_pricing() {
    let (_, app) = app();
    let body = create(&app, SMALL_ZONE, true).await;
    assert_eq!(body["price_cents"], 1500);

    for _ in 0..4 {
        create(&app, SMALL_ZONE, false).await;
    }
    let body = create(&app, SMALL_ZONE, true).await;
    assert_eq!(body["overflow"], true);
    assert_eq!(body["price_cents"], 1800);
}

#[tokio::test]
async fn test_order_validation() {
    let (store, app) = app();

    let (status, body) = post_json(&app, "/orders", json!({"pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid zone_id or pickup_date");

    let (status, _) = post_json(&app, "/orders", json!({"zone_id": "1", "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, "/orders", json!({"zone_id": 99, "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid zone_id");

    let req = Request::post("/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_zone_lookup_failure_rejects_order() {
    let (store, app) = app();
    store.fail_on(FailPoint::GetZone);
    let (status, body) = post_json(&app, "/orders", json!({"zone_id": 1, "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid zone_id");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_order_persistence_failures() {
    let (store, app) = app();
    store.fail_on(FailPoint::CountOrders);
    let (status, body) = post_json(&app, "/orders", json!({"zone_id": 1, "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to compute capacity");

    store.clear_fail(FailPoint::CountOrders);
    store.fail_on(FailPoint::InsertOrder);
    let (status, body) = post_json(&app, "/orders", json!({"zone_id": 1, "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create order");
}

#[tokio::test]
async fn test_ledger_failure_still_creates_order() {
    let (store, app) = app();
    store.fail_on(FailPoint::InsertLedger);
    let body = create(&app, 1, false).await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let (_, ledger) = get(&app, &format!("/ledger?order_id={order_id}")).await;
    assert!(ledger["ledger"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_transactional_ledger_rolls_back() {
    let store = Arc::new(MemoryStore::seeded());
    let app = app_with(store.clone(), Some(SECRET), true);
    store.fail_on(FailPoint::InsertLedger);

    let (status, body) = post_json(&app, "/orders", json!({"zone_id": 1, "pickup_date": DATE})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create order");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_list_orders_by_user() {
    let (_, app) = app();
    let user = uuid::Uuid::new_v4();
    let (status, _) = post_json(
        &app,
        "/orders",
        json!({"zone_id": 1, "pickup_date": DATE, "user_id": user.to_string(), "notes": "side door"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    create(&app, 2, false).await;

    let (status, body) = get(&app, "/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);

    let (_, body) = get(&app, &format!("/orders?user_id={user}")).await;
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["notes"], "side door");

    let (status, body) = get(&app, "/orders?user_id=bob").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user_id");
}

// ============================================================================
// Ledger
// ============================================================================

#[tokio::test]
async fn test_each_order_gets_two_ledger_rows() {
    let (_, app) = app();
    let first = create(&app, 1, true).await;
    create(&app, 1, false).await;

    let order_id = first["order"]["id"].as_str().unwrap();
    let (status, body) = get(&app, &format!("/api/ledger?order_id={order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["ledger"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["order_id"] == order_id));

    let total: i64 = rows.iter().map(|r| r["amount_cents"].as_i64().unwrap()).sum();
    assert_eq!(total, 1500 + 250);

    let mut types: Vec<&str> = rows.iter().map(|r| r["type"].as_str().unwrap()).collect();
    types.sort_unstable();
    assert_eq!(types, ["bonus_pool", "order"]);

    let (_, all) = get(&app, "/ledger").await;
    assert_eq!(all["ledger"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_ledger_rejects_malformed_order_id() {
    let (_, app) = app();
    let (status, body) = get(&app, "/ledger?order_id=42").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid order_id");
}

// ============================================================================
// Webhook
// ============================================================================

#[tokio::test]
async fn test_webhook_confirms_order() {
    let (store, app) = app();
    let body = create(&app, 1, false).await;
    let order_id = body["order"]["id"].as_str().unwrap();

    let event = checkout_completed(order_id);
    let (status, ack) = webhook(&app, &event, Some(signed(&event, SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({"received": true}));

    let id = uuid::Uuid::parse_str(order_id).unwrap();
    assert_eq!(store.order(id).unwrap().status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_webhook_invalid_signature_rejected() {
    let (store, app) = app();
    let body = create(&app, 1, false).await;
    let order_id = body["order"]["id"].as_str().unwrap();
    let id = uuid::Uuid::parse_str(order_id).unwrap();
    let event = checkout_completed(order_id);

    let (status, body) = webhook(&app, &event, Some(signed(&event, "whsec_wrong"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Webhook Error"));

    let (status, _) = webhook(&app, &event, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.order(id).unwrap().status, OrderStatus::Created);
}

#[tokio::test]
async fn test_webhook_unknown_or_missing_order_acknowledged() {
    let (store, app) = app();
    create(&app, 1, false).await;

    let event = checkout_completed(&uuid::Uuid::new_v4().to_string());
    let (status, _) = webhook(&app, &event, Some(signed(&event, SECRET))).await;
    assert_eq!(status, StatusCode::OK);

    let event = json!({
        "type": "checkout.session.completed",
        "data": { "object": {} }
    });
    let (status, ack) = webhook(&app, &event, Some(signed(&event, SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], true);

    let (_, body) = get(&app, "/orders").await;
    assert!(
        body["orders"]
            .as_array()
            .unwrap()
            .iter()
            .all(|o| o["status"] == "created")
    );
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_webhook_without_secret_is_config_error() {
    let store = Arc::new(MemoryStore::seeded());
    let app = app_with(store, None, false);
    let event = checkout_completed(&uuid::Uuid::new_v4().to_string());
    let (status, body) = webhook(&app, &event, Some(signed(&event, SECRET))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Configuration error");
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_unsupported_methods() {
    let (_, app) = app();
    let cases = [
        (Method::DELETE, "/orders", "GET, POST"),
        (Method::PUT, "/api/zones", "GET"),
        (Method::POST, "/ledger", "GET"),
        (Method::GET, "/webhooks/payment-provider", "POST"),
        (Method::POST, "/api/health", "GET"),
    ];
    for (method, uri, allow) in cases {
        let req = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(headers[header::ALLOW], allow);
        assert_eq!(body["error"], format!("Method {method} not allowed"));
    }
}

#[tokio::test]
async fn test_health() {
    let (store, app) = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    drop(store);
}

// ============================================================================
// Booking pages
// ============================================================================

async fn page(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_booking_pages() {
    let (store, app) = app();

    let (status, html) = page(&app, Method::GET, &format!("/book?date={DATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Hillcrest"));
    assert!(html.contains("5 spots left"));

    let (_, html) = page(&app, Method::GET, "/schedule?date=2026-10-20").await;
    assert!(html.contains("Invalid booking data. Please start over."));

    let (_, html) = page(&app, Method::GET, "/schedule?date=2026-10-20&zoneId=3&express=1").await;
    assert!(html.contains("https://cal.example.com/pickup?date=2026-10-20&amp;express=1"));

    let (status, html) = page(&app, Method::POST, "/review?date=2026-10-20&zoneId=3&express=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("$15.00"));
    assert!(html.contains("https://pay.example.com/checkout"));
    assert_eq!(store.order_count(), 1);

    let (status, html) = page(&app, Method::POST, "/review?date=2026-10-20&zoneId=99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("Invalid zone_id"));

    let (_, html) = page(&app, Method::GET, "/success").await;
    assert!(html.contains("Thank you!"));
    let (_, html) = page(&app, Method::GET, "/cancel").await;
    assert!(html.contains("Order Cancelled"));
}
