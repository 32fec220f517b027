//! Classification pipeline.
//!
//! Steps per photo:
//! 1. fingerprint the image on the blocking pool (decode failures stop here);
//! 2. atomically check-and-record the fingerprint, short-circuiting
//!    duplicates to an all-zero result;
//! 3. send the photo to the vision service (the only suspension point that
//!    waits on the network);
//! 4. parse the reply into category counts and derive the dominant category.
//!
//! The fingerprint is reserved before the vision call so a resubmission that
//! arrives while the call is in flight is already a duplicate. What happens to
//! that reservation when the call fails is governed by [`FingerprintPolicy`].

use std::sync::Arc;

use wastetrace_core::classification::{parse_counts, ClassificationResult};
use wastetrace_core::error::CoreError;
use wastetrace_core::fingerprint;
use wastetrace_core::registry::{FingerprintPolicy, FingerprintRegistry};
use wastetrace_vision::{VisionClient, CLASSIFICATION_PROMPT};

pub struct ClassificationPipeline {
    registry: Arc<dyn FingerprintRegistry>,
    vision: Arc<dyn VisionClient>,
    policy: FingerprintPolicy,
}

impl ClassificationPipeline {
    pub fn new(
        registry: Arc<dyn FingerprintRegistry>,
        vision: Arc<dyn VisionClient>,
        policy: FingerprintPolicy,
    ) -> Self {
        Self {
            registry,
            vision,
            policy,
        }
    }

    /// Classify one photograph.
    ///
    /// Errors: [`CoreError::Decode`] for unreadable images,
    /// [`CoreError::ServiceUnavailable`] when the vision call fails. No retries.
    pub async fn classify(&self, image: &[u8]) -> Result<ClassificationResult, CoreError> {
        let owned = image.to_vec();
        let (fingerprint, mime_type) = tokio::task::spawn_blocking(move || {
            fingerprint::compute(&owned).map(|fp| (fp, fingerprint::detect_mime(&owned)))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("Fingerprint task failed: {e}")))??;

        if !self.registry.check_and_record(fingerprint).await? {
            tracing::info!(%fingerprint, "Duplicate image submitted, treating as no waste");
            return Ok(ClassificationResult::duplicate());
        }

        let text = match self
            .vision
            .describe(image, mime_type, CLASSIFICATION_PROMPT)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                let released = match self.policy {
                    FingerprintPolicy::ReleaseOnFailure => {
                        match self.registry.forget(fingerprint).await {
                            Ok(released) => released,
                            Err(forget_err) => {
                                tracing::error!(
                                    %fingerprint,
                                    error = %forget_err,
                                    "Failed to release fingerprint after vision failure"
                                );
                                false
                            }
                        }
                    }
                    FingerprintPolicy::KeepOnFailure => false,
                };
                tracing::warn!(
                    %fingerprint,
                    released,
                    error = %err,
                    "Vision service call failed"
                );
                return Err(CoreError::ServiceUnavailable(err.to_string()));
            }
        };

        tracing::debug!(%fingerprint, raw = %text, "Vision service response");

        let result = ClassificationResult::from_counts(parse_counts(&text));
        tracing::info!(
            %fingerprint,
            total_items = result.total_items,
            dominant = ?result.dominant_category,
            "Image classified"
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
