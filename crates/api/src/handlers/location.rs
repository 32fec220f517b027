//! Handler for the `/send-location` resource.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// A GPS fix reported by the mobile client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// POST /send-location
///
/// Echoes the coordinates back. Non-numeric coordinates are rejected with 400.
pub async fn send_location(
    payload: Result<Json<Location>, JsonRejection>,
) -> AppResult<Json<Location>> {
    let Json(location) = payload?;
    tracing::info!(
        latitude = location.latitude,
        longitude = location.longitude,
        "Location received"
    );
    Ok(Json(location))
}
