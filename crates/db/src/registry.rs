//! Fingerprint registry persisted in the document store.
//!
//! Each recorded fingerprint is a document in [`FINGERPRINTS_COLLECTION`]
//! keyed by its hex form. Recording goes through [`DocumentStore::create`],
//! so the check-then-set is atomic for every backend, and the set survives
//! process restarts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use wastetrace_core::error::CoreError;
use wastetrace_core::fingerprint::ImageFingerprint;
use wastetrace_core::registry::FingerprintRegistry;

use crate::document::DocumentStore;
use crate::FINGERPRINTS_COLLECTION;

pub struct StoreRegistry {
    store: Arc<dyn DocumentStore>,
}

impl StoreRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn body(fingerprint: ImageFingerprint) -> serde_json::Value {
        json!({
            "fingerprint": fingerprint.to_hex(),
            "recordedAt": Utc::now(),
        })
    }
}

#[async_trait]
impl FingerprintRegistry for StoreRegistry {
    async fn seen(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        let doc = self
            .store
            .get(FINGERPRINTS_COLLECTION, &fingerprint.to_hex())
            .await?;
        Ok(doc.is_some())
    }

    async fn record(&self, fingerprint: ImageFingerprint) -> Result<(), CoreError> {
        self.store
            .create(
                FINGERPRINTS_COLLECTION,
                &fingerprint.to_hex(),
                Self::body(fingerprint),
            )
            .await?;
        Ok(())
    }

    async fn check_and_record(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        let inserted = self
            .store
            .create(
                FINGERPRINTS_COLLECTION,
                &fingerprint.to_hex(),
                Self::body(fingerprint),
            )
            .await?;
        Ok(inserted)
    }

    async fn forget(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        let removed = self
            .store
            .delete(FINGERPRINTS_COLLECTION, &fingerprint.to_hex())
            .await?;
        Ok(removed)
    }
}
