//! PostgreSQL [`DocumentStore`] backend.
//!
//! All collections share the `documents` table (JSONB body, `(collection, id)`
//! primary key). Conditional writes are single statements, so
//! `replace_if_version` and `create` are atomic without explicit transactions.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::document::{ensure_object, Document, DocumentStore, DocumentStream};
use crate::error::StoreError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, version, body";

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    version: i64,
    body: Value,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            version: row.version,
            body: row.body,
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = $2");
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Document::from))
    }

    async fn set(&self, collection: &str, id: &str, body: Value) -> Result<Document, StoreError> {
        ensure_object(&body)?;
        let query = format!(
            "INSERT INTO documents (collection, id, body)
             VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE
                SET body = EXCLUDED.body,
                    version = documents.version + 1,
                    updated_at = now()
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(collection)
            .bind(id)
            .bind(&body)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let patch = Value::Object(fields);
        let query = format!(
            "UPDATE documents
             SET body = body || $3, version = version + 1, updated_at = now()
             WHERE collection = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(collection)
            .bind(id)
            .bind(&patch)
            .fetch_optional(&self.pool)
            .await?
            .map(Document::from)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    fn stream<'a>(&'a self, collection: &'a str) -> DocumentStream<'a> {
        sqlx::query_as::<_, DocumentRow>(
            "SELECT id, version, body FROM documents WHERE collection = $1 ORDER BY created_at",
        )
        .bind(collection)
        .fetch(&self.pool)
        .map_ok(Document::from)
        .map_err(StoreError::from)
        .boxed()
    }

    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError> {
        ensure_object(&body)?;
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body)
             VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .execute(&self.pool)
        .await?;
        let inserted = result.rows_affected() == 1;
        if !inserted {
            tracing::debug!(collection, id, "Document already exists, insert skipped");
        }
        Ok(inserted)
    }

    async fn replace_if_version(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        expected_version: i64,
    ) -> Result<Option<Document>, StoreError> {
        ensure_object(&body)?;
        let query = format!(
            "UPDATE documents
             SET body = $3, version = version + 1, updated_at = now()
             WHERE collection = $1 AND id = $2 AND version = $4
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(collection)
            .bind(id)
            .bind(&body)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await?;
        if row.is_none() {
            tracing::debug!(collection, id, expected_version, "Version check missed");
        }
        Ok(row.map(Document::from))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
