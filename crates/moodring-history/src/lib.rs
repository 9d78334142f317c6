//! Moodring History
//!
//! Bounded, insertion-ordered ledger of past analyses and the statistics
//! derived from it. The ledger lives only as long as the process; nothing is
//! persisted.

pub mod entry;
pub mod ledger;
pub mod stats;

pub use entry::{excerpt, HistoryEntry, EXCERPT_MAX_CHARS};
pub use ledger::{HistoryLedger, DEFAULT_CAPACITY, MAX_RECENT};
pub use stats::Statistics;
