//! Orchestration over the core, store and vision crates.
//!
//! - [`classify::ClassificationPipeline`]: photo → fingerprint → duplicate
//!   check → vision call → parsed counts.
//! - [`lifecycle::TicketLifecycle`]: ticket creation, status transitions and
//!   listing over a [`wastetrace_db::DocumentStore`].

pub mod classify;
pub mod lifecycle;

pub use classify::ClassificationPipeline;
pub use lifecycle::TicketLifecycle;
