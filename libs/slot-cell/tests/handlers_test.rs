// libs/slot-cell/tests/handlers_test.rs
//
// Endpoint tests for the slot router over the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_utils::clock;
use slot_cell::router::slot_routes;
use slot_cell::services::SlotService;
use slot_cell::store::MemorySlotStore;

fn app() -> axum::Router {
    let store = Arc::new(MemorySlotStore::new());
    slot_routes(Arc::new(SlotService::new(store)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn future_slot_body(doctor_id: i32, minutes_ahead: i64) -> Value {
    let when = clock::now_local() + Duration::minutes(minutes_ahead);
    json!({
        "doctor_id": doctor_id,
        "hospital_id": 1,
        "date": when.date().to_string(),
        "time": clock::format_hhmm(when.time())
    })
}

#[tokio::test]
async fn create_then_list_doctor_slots() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", future_slot_body(7, 60)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["success"], json!(true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/doctor/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_slot_returns_conflict() {
    let app = app();
    let body = future_slot_body(7, 60);

    let first = app.clone().oneshot(post_json("/", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error = body_json(second).await;
    assert!(error["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn past_slot_returns_conflict() {
    let app = app();

    let response = app
        .oneshot(post_json("/", future_slot_body(7, -30)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_unknown_slot_returns_not_found() {
    let app = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
