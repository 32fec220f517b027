//! Integration tests for the `/tickets` and `/send-location` endpoints.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{body_json, get, send_json, ScriptedVision};
use serde_json::{json, Value};

fn app() -> Router {
    common::build_test_app(Arc::new(ScriptedVision::replying(common::CARDBOARD_REPLY)))
}

async fn create_ticket(app: Router, body: Value) -> Value {
    let response = send_json(app, Method::POST, "/tickets", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn set_status(app: Router, waste_id: &str, body: Value) -> (StatusCode, Value) {
    let response = send_json(
        app,
        Method::PUT,
        &format!("/tickets/{waste_id}/status"),
        body,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_pending_ticket() {
    let ticket = create_ticket(
        app(),
        json!({ "citizenId": "c1", "classification": "plastic", "location": { "lat": 1.5, "lng": 2.5 } }),
    )
    .await;

    let waste_id = ticket["wasteId"].as_str().unwrap();
    assert!(waste_id.starts_with("WT-"));
    assert_eq!(waste_id.len(), 9);
    assert_eq!(ticket["citizenId"], "c1");
    assert_eq!(ticket["classification"], "plastic");
    assert_eq!(ticket["status"], "pending");
    assert_eq!(ticket["ecoPointsAwarded"], 0);
    assert_eq!(ticket["location"]["lat"], 1.5);
    assert!(ticket["timestamps"]["created"].is_string());
    assert!(ticket["timestamps"]["collected"].is_null());
}

#[tokio::test]
async fn create_with_empty_body_uses_defaults() {
    let ticket = create_ticket(app(), json!({})).await;

    assert_eq!(ticket["citizenId"], "demo-citizen");
    assert_eq!(ticket["classification"], "unknown");
}

#[tokio::test]
async fn create_with_malformed_json_returns_400() {
    let response = send_json(app(), Method::POST, "/tickets", json!({ "citizenId": 42 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn get_returns_created_ticket() {
    let app = app();
    let ticket = create_ticket(app.clone(), json!({ "citizenId": "c1" })).await;
    let waste_id = ticket["wasteId"].as_str().unwrap();

    let response = get(app, &format!("/tickets/{waste_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, ticket);
}

#[tokio::test]
async fn get_unknown_ticket_returns_404() {
    let response = get(app(), "/tickets/WT-NOPE00").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collected_then_recycled_awards_points_once() {
    let app = app();
    let ticket = create_ticket(app.clone(), json!({ "citizenId": "c1" })).await;
    let waste_id = ticket["wasteId"].as_str().unwrap();

    let (status, collected) = set_status(
        app.clone(),
        waste_id,
        json!({ "status": "collected", "collectorId": "col-7" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(collected["status"], "collected");
    assert_eq!(collected["collectorId"], "col-7");
    assert!(collected["timestamps"]["collected"].is_string());
    assert_eq!(collected["ecoPointsAwarded"], 0);

    let (_, recycled) = set_status(
        app.clone(),
        waste_id,
        json!({ "status": "recycled", "proofImageUrl": "https://img/proof.jpg" }),
    )
    .await;
    assert_eq!(recycled["status"], "recycled");
    assert_eq!(recycled["ecoPointsAwarded"], 15);
    assert_eq!(recycled["proofImageUrl"], "https://img/proof.jpg");
    assert_eq!(recycled["collectorId"], "col-7");
    assert_eq!(
        recycled["timestamps"]["collected"],
        collected["timestamps"]["collected"]
    );

    let (_, again) = set_status(app, waste_id, json!({ "status": "recycled" })).await;
    assert_eq!(again["ecoPointsAwarded"], 15);
}

#[tokio::test]
async fn unrecognised_status_is_stored_without_side_effects() {
    let app = app();
    let ticket = create_ticket(app.clone(), json!({})).await;
    let waste_id = ticket["wasteId"].as_str().unwrap();

    let (status, updated) = set_status(app, waste_id, json!({ "status": "in-transit" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in-transit");
    assert_eq!(updated["ecoPointsAwarded"], 0);
    assert!(updated["timestamps"]["collected"].is_null());
}

#[tokio::test]
async fn update_unknown_ticket_returns_404() {
    let (status, json) = set_status(app(), "WT-NOPE00", json!({ "status": "collected" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn overlong_status_is_rejected() {
    let app = app();
    let ticket = create_ticket(app.clone(), json!({})).await;
    let waste_id = ticket["wasteId"].as_str().unwrap();

    let (status, json) = set_status(app, waste_id, json!({ "status": "x".repeat(65) })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Listing and stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_citizen_and_status() {
    let app = app();
    let first = create_ticket(app.clone(), json!({ "citizenId": "alice" })).await;
    create_ticket(app.clone(), json!({ "citizenId": "alice" })).await;
    create_ticket(app.clone(), json!({ "citizenId": "bob" })).await;
    set_status(
        app.clone(),
        first["wasteId"].as_str().unwrap(),
        json!({ "status": "collected" }),
    )
    .await;

    let all = body_json(get(app.clone(), "/tickets").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let alice = body_json(get(app.clone(), "/tickets?citizenId=alice").await).await;
    assert_eq!(alice.as_array().unwrap().len(), 2);

    let collected = body_json(get(app, "/tickets?citizenId=alice&status=collected").await).await;
    let collected = collected.as_array().unwrap();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0]["wasteId"], first["wasteId"]);
}

#[tokio::test]
async fn stats_counts_statuses_and_points() {
    let app = app();
    let a = create_ticket(app.clone(), json!({})).await;
    create_ticket(app.clone(), json!({})).await;
    set_status(
        app.clone(),
        a["wasteId"].as_str().unwrap(),
        json!({ "status": "recycled" }),
    )
    .await;

    let response = get(app, "/tickets/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(response).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["recycled"], 1);
    assert_eq!(stats["ecoPointsAwarded"], 15);
}

// ---------------------------------------------------------------------------
// Location echo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_location_echoes_coordinates() {
    let response = send_json(
        app(),
        Method::POST,
        "/send-location",
        json!({ "latitude": 12.97, "longitude": 77.59 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "latitude": 12.97, "longitude": 77.59 })
    );
}

#[tokio::test]
async fn send_location_rejects_non_numeric_coordinates() {
    let response = send_json(
        app(),
        Method::POST,
        "/send-location",
        json!({ "latitude": "north", "longitude": 77.59 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
