use axum::routing::post;
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/send-location", post(location::send_location))
}
