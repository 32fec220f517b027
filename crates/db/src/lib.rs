//! Document-store boundary for WasteTrace.
//!
//! Tickets and persisted fingerprints are JSON documents addressed by
//! `(collection, id)`. [`DocumentStore`] is the abstraction the pipeline
//! crate talks to; [`MemoryStore`] and [`PgStore`] are its backends.

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod registry;

pub use document::{Document, DocumentStore, DocumentStream};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use registry::StoreRegistry;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Collection holding ticket documents, keyed by waste id.
pub const TICKETS_COLLECTION: &str = "waste_tickets";

/// Collection holding recorded image fingerprints, keyed by hex fingerprint.
pub const FINGERPRINTS_COLLECTION: &str = "image_fingerprints";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
