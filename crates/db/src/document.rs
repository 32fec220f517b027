//! The [`DocumentStore`] trait and the [`Document`] envelope.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A stored JSON object plus its optimistic-concurrency version.
///
/// `version` starts at 1 and increases by one on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub version: i64,
    pub body: Value,
}

impl Document {
    /// Deserialize the body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

/// Stream of every document in a collection.
pub type DocumentStream<'a> = BoxStream<'a, Result<Document, StoreError>>;

/// Per-document operations over a collection-scoped JSON store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Full replace, creating the document if absent.
    async fn set(&self, collection: &str, id: &str, body: Value) -> Result<Document, StoreError>;

    /// Shallow-merge top-level `fields` into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// All documents in `collection`, in backend-defined order.
    fn stream<'a>(&'a self, collection: &'a str) -> DocumentStream<'a>;

    /// Insert only if no document with `id` exists. Returns whether it was inserted.
    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError>;

    /// Full replace only if the stored version equals `expected_version`.
    ///
    /// Returns `None` when the versions differ or the document is missing.
    async fn replace_if_version(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        expected_version: i64,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Reject bodies that are not JSON objects.
pub(crate) fn ensure_object(body: &Value) -> Result<(), StoreError> {
    if body.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument(
            "Document body must be a JSON object".to_string(),
        ))
    }
}
