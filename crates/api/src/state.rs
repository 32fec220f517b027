use std::sync::Arc;

use wastetrace_core::registry::{DedupScope, FingerprintRegistry, InMemoryRegistry};
use wastetrace_db::{DocumentStore, StoreRegistry};
use wastetrace_pipeline::{ClassificationPipeline, TicketLifecycle};
use wastetrace_vision::VisionClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Document store backing tickets (and fingerprints in `store` scope).
    pub store: Arc<dyn DocumentStore>,
    /// Photo → counts pipeline with duplicate suppression.
    pub classifier: Arc<ClassificationPipeline>,
    /// Ticket creation, status transitions and listing.
    pub tickets: Arc<TicketLifecycle>,
}

impl AppState {
    /// Wire the pipelines over `store` and `vision` as `config` dictates.
    ///
    /// The fingerprint registry lives in process memory or in the store's
    /// `image_fingerprints` collection depending on `config.dedup_scope`.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn DocumentStore>,
        vision: Arc<dyn VisionClient>,
    ) -> Self {
        let registry: Arc<dyn FingerprintRegistry> = match config.dedup_scope {
            DedupScope::Process => Arc::new(InMemoryRegistry::new()),
            DedupScope::Store => Arc::new(StoreRegistry::new(Arc::clone(&store))),
        };

        let classifier = Arc::new(ClassificationPipeline::new(
            registry,
            vision,
            config.fingerprint_policy,
        ));
        let tickets = Arc::new(TicketLifecycle::new(
            Arc::clone(&store),
            config.ticket_update_max_retries,
        ));

        Self {
            config: Arc::new(config),
            store,
            classifier,
            tickets,
        }
    }
}
