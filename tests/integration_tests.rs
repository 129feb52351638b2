use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use venuedesk::config::AppConfig;
use venuedesk::db;
use venuedesk::state::AppState;

// Monday and Friday far enough ahead that they are never in the past.
const MONDAY: &str = "2099-01-05";
const FRIDAY: &str = "2099-01-09";
const PAST_MONDAY: &str = "2020-01-06";
const MORNING: &str = "6:00 am - 7:30 am";

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    venuedesk::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .header("Content-Type", "application/json")
        .header("X-Admin-Id", "maria")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

// ── Auth ──

#[tokio::test]
async fn test_api_requires_auth() {
    let state = test_state();
    let app = test_app(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/pricing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_wrong_token() {
    let state = test_state();
    let app = test_app(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header("Authorization", "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "unauthorized");
}

// ── Health Check ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let app = test_app(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

// ── Pricing ──

#[tokio::test]
async fn test_default_pricing() {
    let state = test_state();

    let (status, json) = call(&state, get("/api/pricing")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["time_slots"].as_array().unwrap().len(), 14);
    assert_eq!(json["time_slots"][0]["label"], MORNING);
    assert_eq!(json["time_slots"][0]["weekday_price"], 2800);
    assert_eq!(json["weekend_days"], json!(["Friday", "Saturday", "Sunday"]));
}

#[tokio::test]
async fn test_replace_pricing() {
    let state = test_state();

    let body = json!({
        "weekday_days": ["mon", "Tuesday"],
        "weekend_days": ["Saturday"],
        "time_slots": [{"label": "Morning", "weekday_price": "1000", "weekend_price": 1500}]
    });
    let (status, json) = call(&state, send_json("PUT", "/api/pricing", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["weekday_days"], json!(["Monday", "Tuesday"]));
    assert_eq!(json["time_slots"][0]["weekday_price"], 1000);

    // Wednesday is in neither list now
    let (status, json) = call(&state, get("/api/schedule?date=2099-01-07")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tier"], "unclassified");
    assert_eq!(json["slots"][0]["effective_price"], 0);
}

#[tokio::test]
async fn test_replace_pricing_rejects_overlap() {
    let state = test_state();

    let body = json!({
        "weekday_days": ["Monday"],
        "weekend_days": ["monday"],
        "time_slots": [{"label": "Morning", "weekday_price": 1000, "weekend_price": 1500}]
    });
    let (status, json) = call(&state, send_json("PUT", "/api/pricing", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation_error");

    // Unchanged
    let (_, json) = call(&state, get("/api/pricing")).await;
    assert_eq!(json["time_slots"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_huge_price_rejected_and_service_stays_up() {
    let state = test_state();

    let body = json!({
        "weekday_days": ["Monday"],
        "weekend_days": ["Saturday"],
        "time_slots": [{"label": MORNING, "weekday_price": 2e17, "weekend_price": 100}]
    });
    let (status, json) = call(&state, send_json("PUT", "/api/pricing", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation_error");

    let body = json!({"percent": 10, "until": "2099-12-31"});
    let (status, _) = call(&state, send_json("POST", "/api/discounts", body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = call(&state, get(&format!("/api/schedule?date={MONDAY}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["slots"][0]["effective_price"], 2520);

    let (status, _) = call(&state, get("/api/pricing")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_replace_pricing_rejects_empty_slots() {
    let state = test_state();

    let body = json!({"weekday_days": ["Monday"], "weekend_days": ["Saturday"], "time_slots": []});
    let (status, _) = call(&state, send_json("PUT", "/api/pricing", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let state = test_state();

    let req = Request::builder()
        .method("PUT")
        .uri("/api/pricing")
        .header("Authorization", "Bearer test-token")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = call(&state, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation_error");
}

// ── Discounts ──

#[tokio::test]
async fn test_discount_lifecycle() {
    let state = test_state();

    let body = json!({
        "percent": 15,
        "until": "2099-01-31",
        "created_at": "2099-01-01",
        "reason": "winter",
        "slots": [MORNING]
    });
    let (status, created) = call(&state, send_json("POST", "/api/discounts", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["percent"], 15);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, json) = call(&state, get(&format!("/api/quote?date={MONDAY}&slot={}", "6:00%20am%20-%207:30%20am"))).await;
    assert_eq!(json["base_price"], 2800);
    assert_eq!(json["effective_price"], 2380);
    assert_eq!(json["applied_discount"]["id"], id.as_str());

    let (_, json) = call(&state, get(&format!("/api/schedule?date={MONDAY}"))).await;
    assert_eq!(json["slots"][0]["applied_discount_percent"], 15);
    assert_eq!(json["slots"][1]["applied_discount_percent"], Value::Null);

    let (_, list) = call(&state, get("/api/discounts")).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/discounts/{id}"))
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(&state, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/discounts/{id}"))
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, json) = call(&state, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "not_found");
}

#[tokio::test]
async fn test_discount_validation() {
    let state = test_state();

    let (status, _) = call(&state, send_json("POST", "/api/discounts", json!({"percent": 150, "until": "2099-01-31"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&state, send_json("POST", "/api/discounts", json!({"percent": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"percent": 10, "until": "2099-01-31", "days": ["Funday"]});
    let (status, _) = call(&state, send_json("POST", "/api/discounts", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Schedule & Quote ──

#[tokio::test]
async fn test_schedule_requires_date() {
    let state = test_state();

    let (status, _) = call(&state, get("/api/schedule")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&state, get("/api/schedule?date=someday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weekend_schedule() {
    let state = test_state();

    let (status, json) = call(&state, get(&format!("/api/schedule?date={FRIDAY}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["day_name"], "Friday");
    assert_eq!(json["tier"], "weekend");
    assert_eq!(json["is_past"], false);
    assert_eq!(json["slots"][0]["base_price"], 3300);
    assert_eq!(json["slots"][0]["booking_state"], "available");
}

#[tokio::test]
async fn test_quote_unknown_slot() {
    let state = test_state();

    let (status, _) = call(&state, get(&format!("/api/quote?date={MONDAY}&slot=midnight"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&state, get(&format!("/api/quote?date={MONDAY}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Bookings ──

fn booking_body(date: &str) -> Value {
    json!({
        "date": date,
        "slot_label": MORNING,
        "customer_name": "Bob",
        "customer_phone": "+15551110000"
    })
}

#[tokio::test]
async fn test_book_and_double_book() {
    let state = test_state();

    let (status, booking) = call(&state, send_json("POST", "/api/bookings", booking_body(MONDAY))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["customer_name"], "Bob");
    assert_eq!(booking["booked_by"], "maria");
    assert_eq!(booking["price"], 2800);
    assert_eq!(booking["canceled_at"], Value::Null);

    let (status, json) = call(&state, send_json("POST", "/api/bookings", booking_body(MONDAY))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["kind"], "conflict");

    let (_, json) = call(&state, get(&format!("/api/schedule?date={MONDAY}"))).await;
    assert_eq!(json["slots"][0]["booking_state"], "booked");
    assert_eq!(json["slots"][0]["booking"]["id"], booking["id"]);
}

#[tokio::test]
async fn test_cancel_then_rebook_reuses_record() {
    let state = test_state();

    let (_, booking) = call(&state, send_json("POST", "/api/bookings", booking_body(MONDAY))).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/api/bookings/{id}/cancel");
    let (status, canceled) = call(&state, send_json("POST", &cancel_uri, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["canceled_by"], "maria");

    let (status, _) = call(&state, send_json("POST", &cancel_uri, json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = call(&state, get(&format!("/api/schedule?date={MONDAY}"))).await;
    assert_eq!(json["slots"][0]["booking_state"], "canceled");

    let mut body = booking_body(MONDAY);
    body["customer_name"] = json!("Carol");
    body["price"] = json!(2000);
    let (status, rebooked) = call(&state, send_json("POST", "/api/bookings", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rebooked["id"], id.as_str());
    assert_eq!(rebooked["customer_name"], "Carol");
    assert_eq!(rebooked["price"], 2000);
    assert_eq!(rebooked["canceled_at"], Value::Null);

    let (_, list) = call(&state, get(&format!("/api/bookings?date={MONDAY}"))).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_past_date_rejected() {
    let state = test_state();

    let (status, json) = call(&state, send_json("POST", "/api/bookings", booking_body(PAST_MONDAY))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "past_date");
}

#[tokio::test]
async fn test_book_unknown_slot_rejected() {
    let state = test_state();

    let mut body = booking_body(MONDAY);
    body["slot_label"] = json!("midnight");
    let (status, json) = call(&state, send_json("POST", "/api/bookings", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation_error");
}

#[tokio::test]
async fn test_patch_booking_is_sparse() {
    let state = test_state();

    let (_, booking) = call(&state, send_json("POST", "/api/bookings", booking_body(MONDAY))).await;
    let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());

    let (status, patched) = call(&state, send_json("PATCH", &uri, json!({"price": 2500}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["price"], 2500);
    assert_eq!(patched["customer_name"], "Bob");
    assert_eq!(patched["customer_phone"], "+15551110000");

    let (status, _) = call(&state, send_json("PATCH", "/api/bookings/missing", json!({"price": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_booking_null_and_invalid_values() {
    let state = test_state();

    let mut body = booking_body(MONDAY);
    body["reason"] = json!("birthday");
    let (_, booking) = call(&state, send_json("POST", "/api/bookings", body)).await;
    let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());

    let (status, patched) = call(&state, send_json("PATCH", &uri, json!({"reason": null, "customer_phone": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["reason"], "");
    assert_eq!(patched["customer_phone"], "");
    assert_eq!(patched["customer_name"], "Bob");

    let (status, json) = call(&state, send_json("PATCH", &uri, json!({"price": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation_error");

    let (status, _) = call(&state, send_json("PATCH", &uri, json!({"customer_name": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = call(&state, get(&format!("/api/bookings?date={MONDAY}"))).await;
    assert_eq!(list[0]["price"], 2800);
    assert_eq!(list[0]["customer_name"], "Bob");
}

#[tokio::test]
async fn test_cancel_unknown_booking() {
    let state = test_state();

    let (status, _) = call(&state, send_json("POST", "/api/bookings/nope/cancel", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Dashboard ──

#[tokio::test]
async fn test_dashboard() {
    let state = test_state();

    let body = json!({"percent": 10, "until": "2099-12-31"});
    call(&state, send_json("POST", "/api/discounts", body)).await;

    let (status, json) = call(&state, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discounts"].as_array().unwrap().len(), 1);
    assert!(json["today_bookings"].as_array().unwrap().is_empty());
    assert!(json["stats"]["last_week"]["most_booked_slots"].is_array());
    assert!(json["stats"]["last_year"]["quiet_days"].is_array());
}
