//! WasteTrace domain core.
//!
//! Pure domain logic shared by the store, pipeline and API crates: waste
//! categories and count parsing, perceptual fingerprints, the duplicate
//! registry contract, and the ticket model with its status transitions.

pub mod category;
pub mod classification;
pub mod error;
pub mod fingerprint;
pub mod registry;
pub mod ticket;
pub mod types;
