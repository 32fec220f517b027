use axum::routing::post;
use axum::Router;

use crate::handlers::classify;
use crate::state::AppState;

/// Photo classification.
///
/// ```text
/// POST /classify-image    classify_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/classify-image", post(classify::classify_image))
}
