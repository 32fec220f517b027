//! In-process [`DocumentStore`] backend.
//!
//! Used for local development and tests. Every operation takes the lock
//! once, so compare-and-swap and insert-if-absent are atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::document::{ensure_object, Document, DocumentStore, DocumentStream};
use crate::error::StoreError;

type Collection = HashMap<String, Document>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, body: Value) -> Result<Document, StoreError> {
        ensure_object(&body)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let version = docs.get(id).map_or(1, |existing| existing.version + 1);
        let doc = Document {
            id: id.to_string(),
            version,
            body,
        };
        docs.insert(id.to_string(), doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let body = doc.body.as_object_mut().ok_or_else(|| {
            StoreError::InvalidDocument(format!("{collection}/{id} is not a JSON object"))
        })?;
        body.extend(fields);
        doc.version += 1;
        Ok(doc.clone())
    }

    fn stream<'a>(&'a self, collection: &'a str) -> DocumentStream<'a> {
        stream::once(async move {
            let collections = self.collections.read().await;
            let docs: Vec<Document> = collections
                .get(collection)
                .map(|docs| docs.values().cloned().collect())
                .unwrap_or_default();
            stream::iter(docs.into_iter().map(Ok::<Document, StoreError>))
        })
        .flatten()
        .boxed()
    }

    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError> {
        ensure_object(&body)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Ok(false);
        }
        docs.insert(
            id.to_string(),
            Document {
                id: id.to_string(),
                version: 1,
                body,
            },
        );
        Ok(true)
    }

    async fn replace_if_version(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        expected_version: i64,
    ) -> Result<Option<Document>, StoreError> {
        ensure_object(&body)?;
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(None);
        };
        if doc.version != expected_version {
            tracing::debug!(
                collection,
                id,
                expected_version,
                actual_version = doc.version,
                "Version check missed"
            );
            return Ok(None);
        }
        doc.body = body;
        doc.version += 1;
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use futures::TryStreamExt;
    use serde_json::json;

    use super::*;

    const COLL: &str = "things";

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn set_then_get_returns_document() {
        let store = MemoryStore::new();
        let doc = store.set(COLL, "a", json!({ "n": 1 })).await.unwrap();
        assert_eq!(doc.version, 1);

        let fetched = store.get(COLL, "a").await.unwrap().unwrap();
        assert_eq!(fetched.body, json!({ "n": 1 }));
        assert!(store.get(COLL, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_replaces_whole_body_and_bumps_version() {
        let store = MemoryStore::new();
        store.set(COLL, "a", json!({ "n": 1, "keep": true })).await.unwrap();
        let doc = store.set(COLL, "a", json!({ "n": 2 })).await.unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.body, json!({ "n": 2 }));
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store.set(COLL, "a", json!({ "n": 1, "keep": true })).await.unwrap();
        let doc = store
            .update(COLL, "a", fields(json!({ "n": 5, "extra": "x" })))
            .await
            .unwrap();
        assert_eq!(doc.body, json!({ "n": 5, "keep": true, "extra": "x" }));
        assert_eq!(doc.version, 2);
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(COLL, "nope", Map::new()).await.unwrap_err();
        assert_matches!(err, StoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn create_is_insert_if_absent() {
        let store = MemoryStore::new();
        assert!(store.create(COLL, "a", json!({ "v": 1 })).await.unwrap());
        assert!(!store.create(COLL, "a", json!({ "v": 2 })).await.unwrap());
        let doc = store.get(COLL, "a").await.unwrap().unwrap();
        assert_eq!(doc.body, json!({ "v": 1 }));
    }

    #[tokio::test]
    async fn replace_if_version_rejects_stale_version() {
        let store = MemoryStore::new();
        let doc = store.set(COLL, "a", json!({ "v": 1 })).await.unwrap();
        store.set(COLL, "a", json!({ "v": 2 })).await.unwrap();

        let stale = store
            .replace_if_version(COLL, "a", json!({ "v": 3 }), doc.version)
            .await
            .unwrap();
        assert!(stale.is_none());

        let fresh = store
            .replace_if_version(COLL, "a", json!({ "v": 3 }), 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fresh.version, 3);
    }

    #[tokio::test]
    async fn replace_if_version_on_missing_document_is_none() {
        let store = MemoryStore::new();
        let result = store
            .replace_if_version(COLL, "ghost", json!({}), 1)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stream_yields_only_requested_collection() {
        let store = MemoryStore::new();
        store.set(COLL, "a", json!({})).await.unwrap();
        store.set(COLL, "b", json!({})).await.unwrap();
        store.set("other", "c", json!({})).await.unwrap();

        let mut ids: Vec<String> = store
            .stream(COLL)
            .map_ok(|doc| doc.id)
            .try_collect()
            .await
            .unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        let empty: Vec<Document> = store.stream("nothing").try_collect().await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = MemoryStore::new();
        store.set(COLL, "a", json!({})).await.unwrap();
        assert!(store.delete(COLL, "a").await.unwrap());
        assert!(!store.delete(COLL, "a").await.unwrap());
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let store = MemoryStore::new();
        let err = store.set(COLL, "a", json!([1, 2])).await.unwrap_err();
        assert_matches!(err, StoreError::InvalidDocument(_));
    }
}
