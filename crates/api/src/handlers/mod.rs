//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the pipelines in [`crate::state::AppState`] and map
//! errors via [`crate::error::AppError`].

pub mod classify;
pub mod location;
pub mod tickets;
