//! Ticket lifecycle engine.
//!
//! Tickets are persisted as full documents in [`TICKETS_COLLECTION`]. Status
//! updates are read-modify-write cycles guarded by the store's version
//! compare-and-swap: on a version conflict the ticket is re-read and the
//! update re-applied, up to `max_retries` extra attempts.

use std::sync::Arc;

use chrono::Utc;
use futures::TryStreamExt;
use wastetrace_core::error::CoreError;
use wastetrace_core::ticket::{
    generate_waste_id, NewTicket, StatusUpdate, Ticket, TicketFilter, TicketStats,
};
use wastetrace_db::{DocumentStore, TICKETS_COLLECTION};

/// Default number of re-attempts after a version conflict.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fresh waste ids drawn before `create` gives up on collisions.
const MAX_ID_ATTEMPTS: u32 = 8;

pub struct TicketLifecycle {
    store: Arc<dyn DocumentStore>,
    max_retries: u32,
}

impl TicketLifecycle {
    pub fn new(store: Arc<dyn DocumentStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// Create a `pending` ticket with a fresh waste id.
    ///
    /// The ticket is inserted only if its id is unused; on a collision a new
    /// id is drawn, up to [`MAX_ID_ATTEMPTS`] times.
    pub async fn create(&self, input: NewTicket) -> Result<Ticket, CoreError> {
        let now = Utc::now();

        for attempt in 0..MAX_ID_ATTEMPTS {
            let ticket = Ticket::new(generate_waste_id(), input.clone(), now);
            let inserted = self
                .store
                .create(TICKETS_COLLECTION, &ticket.waste_id, to_body(&ticket)?)
                .await?;

            if inserted {
                tracing::info!(
                    waste_id = %ticket.waste_id,
                    citizen_id = %ticket.citizen_id,
                    classification = %ticket.classification,
                    "Ticket created"
                );
                return Ok(ticket);
            }

            tracing::warn!(waste_id = %ticket.waste_id, attempt, "Waste id collision, drawing another");
        }

        Err(CoreError::Conflict(format!(
            "Could not allocate an unused waste id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Fetch one ticket. Fails with [`CoreError::NotFound`] for unknown ids.
    pub async fn get(&self, waste_id: &str) -> Result<Ticket, CoreError> {
        let doc = self
            .store
            .get(TICKETS_COLLECTION, waste_id)
            .await?
            .ok_or_else(|| not_found(waste_id))?;
        Ok(doc.decode()?)
    }

    /// Apply a status update and persist the whole ticket.
    ///
    /// Fails with [`CoreError::NotFound`] for unknown ids, with
    /// [`CoreError::Validation`] for an invalid status, and with
    /// [`CoreError::Conflict`] if concurrent writers win every attempt.
    pub async fn update_status(
        &self,
        waste_id: &str,
        update: &StatusUpdate,
    ) -> Result<Ticket, CoreError> {
        // Reject a bad status before touching the store.
        update.parsed_status()?;

        for attempt in 0..=self.max_retries {
            let doc = self
                .store
                .get(TICKETS_COLLECTION, waste_id)
                .await?
                .ok_or_else(|| not_found(waste_id))?;

            let mut ticket: Ticket = doc.decode()?;
            ticket.apply(update, Utc::now())?;

            let replaced = self
                .store
                .replace_if_version(TICKETS_COLLECTION, waste_id, to_body(&ticket)?, doc.version)
                .await?;

            if replaced.is_some() {
                tracing::info!(
                    waste_id,
                    status = %ticket.status,
                    eco_points = ticket.eco_points_awarded,
                    "Ticket status updated"
                );
                return Ok(ticket);
            }

            tracing::warn!(waste_id, attempt, "Ticket version conflict, retrying");
        }

        Err(CoreError::Conflict(format!(
            "Ticket {waste_id} was modified concurrently; gave up after {} attempts",
            self.max_retries.saturating_add(1)
        )))
    }

    /// All tickets, in store order.
    pub async fn list(&self) -> Result<Vec<Ticket>, CoreError> {
        self.list_filtered(&TicketFilter::default()).await
    }

    /// Tickets matching every field set on `filter`.
    pub async fn list_filtered(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, CoreError> {
        let docs: Vec<_> = self.store.stream(TICKETS_COLLECTION).try_collect().await?;

        let mut tickets = Vec::with_capacity(docs.len());
        for doc in docs {
            let ticket: Ticket = doc.decode()?;
            if filter.matches(&ticket) {
                tickets.push(ticket);
            }
        }
        Ok(tickets)
    }

    /// Counts per status and total eco points across all tickets.
    pub async fn stats(&self) -> Result<TicketStats, CoreError> {
        let tickets = self.list().await?;
        Ok(TicketStats::from_tickets(&tickets))
    }
}

fn to_body(ticket: &Ticket) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(ticket)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize ticket: {e}")))
}

fn not_found(waste_id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Ticket",
        id: waste_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
