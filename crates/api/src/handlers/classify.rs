//! Handler for the `/classify-image` resource.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use wastetrace_core::category::{Category, CategoryCounts};
use wastetrace_core::classification::ClassificationResult;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the photo.
const FILE_FIELD: &str = "file";

/// Wire shape of a classification outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub counts: CategoryCounts,
    pub total_items: u64,
    pub duplicate: bool,
    pub message: String,
}

impl From<ClassificationResult> for ClassifyResponse {
    fn from(result: ClassificationResult) -> Self {
        let message = result.message();
        Self {
            detected: result.detected,
            category: result.dominant_category,
            counts: result.counts,
            total_items: result.total_items,
            duplicate: result.duplicate,
            message,
        }
    }
}

/// POST /classify-image
///
/// Accepts a `multipart/form-data` body with a `file` field holding the
/// photo. Unknown fields are ignored.
pub async fn classify_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ClassifyResponse>> {
    let mut image: Option<Vec<u8>> = None;

    // Multipart errors convert via `From`, keeping 413 for oversize bodies.
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            let data = field.bytes().await?;
            image = Some(data.to_vec());
        }
    }

    let image =
        image.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if image.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let result = state.classifier.classify(&image).await?;
    Ok(Json(result.into()))
}
