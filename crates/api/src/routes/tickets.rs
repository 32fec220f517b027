use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Ticket routes, nested under `/tickets`.
///
/// ```text
/// GET    /                    list
/// POST   /                    create
/// GET    /stats               stats
/// GET    /{waste_id}          get_by_id
/// PUT    /{waste_id}/status   update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route("/stats", get(tickets::stats))
        .route("/{waste_id}", get(tickets::get_by_id))
        .route("/{waste_id}/status", put(tickets::update_status))
}
