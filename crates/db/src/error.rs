use wastetrace_core::error::CoreError;

/// Errors raised by document-store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Document bodies must be JSON objects.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => CoreError::NotFound {
                entity: "Document",
                id,
            },
            other => CoreError::Internal(other.to_string()),
        }
    }
}
