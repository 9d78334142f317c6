//! Moodring Core
//!
//! Core types and error handling shared across Moodring components.
//!
//! This crate provides:
//! - The sentiment result model produced by the engine
//! - Backend identifiers used to request and report scorers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AnalysisResult, Backend, BackendDetails, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AnalysisResult, Backend, BackendDetails, Sentiment};
}
