//! Waste ticket model and status transitions.
//!
//! A ticket is created `pending` and then moves through `collected` and
//! `recycled`. The status set is open: any other non-empty status string is
//! kept as [`TicketStatus::Other`]. Transitions are computed here in memory;
//! persisting the result is the store layer's job.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix of every generated waste id.
pub const WASTE_ID_PREFIX: &str = "WT-";

/// Number of random hex characters after the prefix.
pub const WASTE_ID_SUFFIX_LEN: usize = 6;

/// Flat eco-point reward for a recycled ticket.
pub const ECO_POINTS_RECYCLED: u32 = 15;

/// Citizen id used when a create request omits one.
pub const DEFAULT_CITIZEN_ID: &str = "demo-citizen";

/// Classification label used when a create request omits one.
pub const DEFAULT_CLASSIFICATION: &str = "unknown";

/// Maximum length of a custom status string.
pub const MAX_STATUS_LENGTH: usize = 64;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COLLECTED: &str = "collected";
pub const STATUS_RECYCLED: &str = "recycled";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Ticket status. Unknown strings are preserved in [`TicketStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Pending,
    Collected,
    Recycled,
    Other(String),
}

impl TicketStatus {
    /// Parse a caller-supplied status. Known names match case-insensitively;
    /// anything else non-empty becomes [`TicketStatus::Other`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Status must not be empty".to_string()));
        }
        if trimmed.len() > MAX_STATUS_LENGTH {
            return Err(CoreError::Validation(format!(
                "Status must be at most {MAX_STATUS_LENGTH} characters"
            )));
        }

        let status = match trimmed.to_ascii_lowercase().as_str() {
            STATUS_PENDING => Self::Pending,
            STATUS_COLLECTED => Self::Collected,
            STATUS_RECYCLED => Self::Recycled,
            _ => Self::Other(trimmed.to_string()),
        };
        Ok(status)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Collected => STATUS_COLLECTED,
            Self::Recycled => STATUS_RECYCLED,
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TicketStatus::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTimestamps {
    pub created: Timestamp,
    pub collected: Option<Timestamp>,
    pub recycled: Option<Timestamp>,
}

/// One reported waste-disposal event, as stored in the `waste_tickets`
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub waste_id: String,
    pub citizen_id: String,
    pub classification: String,
    pub status: TicketStatus,
    /// Caller-supplied payload, stored as given.
    pub location: Option<serde_json::Value>,
    pub eco_points_awarded: u32,
    pub collector_id: Option<String>,
    pub proof_image_url: Option<String>,
    pub timestamps: TicketTimestamps,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a ticket. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub citizen_id: Option<String>,
    pub classification: Option<String>,
    pub location: Option<serde_json::Value>,
}

/// Partial status-update request. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: Option<String>,
    pub collector_id: Option<String>,
    pub proof_image_url: Option<String>,
}

impl StatusUpdate {
    /// The requested status, if one was given.
    pub fn parsed_status(&self) -> Result<Option<TicketStatus>, CoreError> {
        non_empty(&self.status).map(TicketStatus::parse).transpose()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Construction and transitions
// ---------------------------------------------------------------------------

/// Generate a waste id of the form `WT-XXXXXX` (uppercase hex).
///
/// Collisions are not checked.
pub fn generate_waste_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!(
        "{WASTE_ID_PREFIX}{}",
        hex[..WASTE_ID_SUFFIX_LEN].to_ascii_uppercase()
    )
}

/// Whether `id` has the generated waste-id shape.
pub fn is_valid_waste_id(id: &str) -> bool {
    id.strip_prefix(WASTE_ID_PREFIX).is_some_and(|suffix| {
        suffix.len() == WASTE_ID_SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    })
}

impl Ticket {
    /// Build a fresh `pending` ticket.
    pub fn new(waste_id: String, input: NewTicket, now: Timestamp) -> Self {
        Self {
            waste_id,
            citizen_id: input
                .citizen_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CITIZEN_ID.to_string()),
            classification: input
                .classification
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CLASSIFICATION.to_string()),
            status: TicketStatus::Pending,
            location: input.location,
            eco_points_awarded: 0,
            collector_id: None,
            proof_image_url: None,
            timestamps: TicketTimestamps {
                created: now,
                collected: None,
                recycled: None,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status-update request at time `now`.
    ///
    /// Order: status (with its timestamp/points side effects), collector,
    /// proof image, then `updated_at`. Re-entering `collected` keeps the first
    /// collection time; reaching `recycled` sets the flat reward, never adds.
    pub fn apply(&mut self, update: &StatusUpdate, now: Timestamp) -> Result<(), CoreError> {
        if let Some(status) = update.parsed_status()? {
            match status {
                TicketStatus::Collected => {
                    self.timestamps.collected.get_or_insert(now);
                }
                TicketStatus::Recycled => {
                    self.timestamps.recycled = Some(now);
                    self.eco_points_awarded = ECO_POINTS_RECYCLED;
                }
                TicketStatus::Pending | TicketStatus::Other(_) => {}
            }
            self.status = status;
        }

        if let Some(collector_id) = non_empty(&update.collector_id) {
            self.collector_id = Some(collector_id.to_string());
        }

        if let Some(url) = non_empty(&update.proof_image_url) {
            self.proof_image_url = Some(url.to_string());
        }

        self.updated_at = now;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filters and aggregates
// ---------------------------------------------------------------------------

/// Optional equality filters for listing tickets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub citizen_id: Option<String>,
    pub collector_id: Option<String>,
    pub status: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(citizen) = non_empty(&self.citizen_id) {
            if ticket.citizen_id != citizen {
                return false;
            }
        }
        if let Some(collector) = non_empty(&self.collector_id) {
            if ticket.collector_id.as_deref() != Some(collector) {
                return false;
            }
        }
        if let Some(status) = non_empty(&self.status) {
            if !ticket.status.as_str().eq_ignore_ascii_case(status.trim()) {
                return false;
            }
        }
        true
    }
}

/// Ticket counts per status and total points awarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: u64,
    pub pending: u64,
    pub collected: u64,
    pub recycled: u64,
    pub other: u64,
    pub eco_points_awarded: u64,
}

impl TicketStats {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        tickets.into_iter().fold(Self::default(), |mut stats, ticket| {
            stats.total += 1;
            match ticket.status {
                TicketStatus::Pending => stats.pending += 1,
                TicketStatus::Collected => stats.collected += 1,
                TicketStatus::Recycled => stats.recycled += 1,
                TicketStatus::Other(_) => stats.other += 1,
            }
            stats.eco_points_awarded += u64::from(ticket.eco_points_awarded);
            stats
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
