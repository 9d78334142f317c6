//! History entries

use chrono::{DateTime, Utc};
use moodring_core::{AnalysisResult, Sentiment};
use serde::{Deserialize, Serialize};

/// Maximum length of the stored text excerpt, in characters
pub const EXCERPT_MAX_CHARS: usize = 100;

/// Summary of one successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Leading excerpt of the analyzed text
    #[serde(rename = "text")]
    pub text_excerpt: String,

    pub sentiment: Sentiment,

    pub confidence: f64,

    /// When the boundary recorded the analysis
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(text: &str, result: &AnalysisResult, timestamp: DateTime<Utc>) -> Self {
        Self::with_excerpt_len(text, result, timestamp, EXCERPT_MAX_CHARS)
    }

    pub fn with_excerpt_len(
        text: &str,
        result: &AnalysisResult,
        timestamp: DateTime<Utc>,
        max_chars: usize,
    ) -> Self {
        Self {
            text_excerpt: excerpt(text, max_chars),
            sentiment: result.sentiment,
            confidence: result.confidence,
            timestamp,
        }
    }

    /// Entry timestamped now
    pub fn capture(text: &str, result: &AnalysisResult) -> Self {
        Self::new(text, result, Utc::now())
    }
}

/// First `max_chars` characters of `text`
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
