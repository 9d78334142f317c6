//! Moodring Server
//!
//! HTTP boundary and command-line interface for the sentiment engine. The
//! service analyzes feedback text, records each analysis in a bounded history
//! ledger, and reports aggregate statistics.

pub mod app;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use app::{build_app, run_server};
pub use config::ServerConfig;
pub use state::AppState;
