pub mod classify;
pub mod health;
pub mod location;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Routes are mounted at the root so existing mobile and web clients keep
/// their paths.
///
/// ```text
/// /classify-image                  classify photo (POST, multipart "file")
///
/// /tickets                         list (GET ?citizenId&collectorId&status), create (POST)
/// /tickets/stats                   status counts and eco-points (GET)
/// /tickets/{waste_id}              get (GET)
/// /tickets/{waste_id}/status       status transition (PUT)
///
/// /send-location                   echo a GPS fix (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(classify::router())
        .nest("/tickets", tickets::router())
        .merge(location::router())
}
