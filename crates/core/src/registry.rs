//! Duplicate-photo registry contract and the process-memory implementation.
//!
//! A registry remembers which [`ImageFingerprint`]s have already been
//! classified. [`FingerprintRegistry::check_and_record`] is the atomic
//! check-then-set used by the classification pipeline: of several concurrent
//! callers presenting the same fingerprint, exactly one sees `true`.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::fingerprint::ImageFingerprint;

/// Where recorded fingerprints live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupScope {
    /// Held in process memory; cleared on restart.
    Process,
    /// Persisted in the document store; survives restarts.
    Store,
}

impl DedupScope {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "process" | "memory" => Ok(Self::Process),
            "store" | "persistent" => Ok(Self::Store),
            other => Err(CoreError::Validation(format!(
                "Unknown dedup scope '{other}'. Must be one of: process, store"
            ))),
        }
    }
}

/// What happens to a reserved fingerprint when the vision call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintPolicy {
    /// The fingerprint stays recorded; a resubmission after a failed call is
    /// reported as a duplicate.
    #[default]
    KeepOnFailure,
    /// The fingerprint is forgotten so the same photo can be retried.
    ReleaseOnFailure,
}

#[async_trait]
pub trait FingerprintRegistry: Send + Sync {
    /// Whether `fingerprint` has been recorded.
    async fn seen(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError>;

    /// Record `fingerprint` unconditionally.
    async fn record(&self, fingerprint: ImageFingerprint) -> Result<(), CoreError>;

    /// Atomically record `fingerprint` if absent. Returns `true` when this
    /// call recorded it, `false` when it was already present.
    async fn check_and_record(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError>;

    /// Remove `fingerprint`. Returns whether it was present.
    async fn forget(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError>;
}

/// Process-lifetime registry backed by a mutex-guarded set.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    seen: Mutex<HashSet<ImageFingerprint>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.seen.lock().await.len()
    }
}

#[async_trait]
impl FingerprintRegistry for InMemoryRegistry {
    async fn seen(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        Ok(self.seen.lock().await.contains(&fingerprint))
    }

    async fn record(&self, fingerprint: ImageFingerprint) -> Result<(), CoreError> {
        self.seen.lock().await.insert(fingerprint);
        Ok(())
    }

    async fn check_and_record(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        Ok(self.seen.lock().await.insert(fingerprint))
    }

    async fn forget(&self, fingerprint: ImageFingerprint) -> Result<bool, CoreError> {
        Ok(self.seen.lock().await.remove(&fingerprint))
    }
}
