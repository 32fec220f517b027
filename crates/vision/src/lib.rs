//! Vision-service boundary.
//!
//! The classifier treats the vision model as an opaque function from image
//! bytes to free text. [`VisionClient`] is that seam; [`GeminiClient`] talks
//! to the Gemini `generateContent` REST endpoint.

pub mod client;
pub mod config;
pub mod gemini;
pub mod prompt;

pub use client::{VisionClient, VisionError};
pub use config::VisionConfig;
pub use gemini::GeminiClient;
pub use prompt::CLASSIFICATION_PROMPT;
