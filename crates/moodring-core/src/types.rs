//! Core types for Moodring

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment category assigned to a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring backend, used both to request a scorer and to report which one ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Rule/lexicon-based scorer (always available)
    #[default]
    Lexicon,
    /// Pretrained transformer classifier (may be unavailable)
    Pretrained,
}

impl Backend {
    /// Resolve a backend from a user-supplied name.
    ///
    /// Never fails: anything that is not a recognized pretrained alias
    /// resolves to [`Backend::Lexicon`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretrained" | "transformers" | "transformer" | "distilbert" => Self::Pretrained,
            _ => Self::Lexicon,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexicon => "lexicon",
            Self::Pretrained => "pretrained",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-specific scores carried by an [`AnalysisResult`].
///
/// The variant tag doubles as `backend_used`, so a result can never carry
/// lexicon fields while claiming the pretrained backend or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend_used", rename_all = "lowercase")]
pub enum BackendDetails {
    Lexicon {
        /// Signed polarity in [-1, 1]
        polarity: f64,
        /// Subjectivity in [0, 1]
        subjectivity: f64,
    },
    Pretrained {
        /// Probability of the predicted label in [0, 1]
        raw_score: f64,
    },
}

impl BackendDetails {
    /// The backend these details came from
    pub fn backend(&self) -> Backend {
        match self {
            Self::Lexicon { .. } => Backend::Lexicon,
            Self::Pretrained { .. } => Backend::Pretrained,
        }
    }
}

/// Normalized output of the sentiment engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Assigned category
    pub sentiment: Sentiment,

    /// Confidence in the category, 0-100
    pub confidence: f64,

    /// Backend that actually produced the result and its raw scores
    #[serde(flatten)]
    pub details: BackendDetails,

    /// Name of the scorer that produced the result
    pub model: String,

    /// Set only for the degenerate result returned for empty input
    #[serde(default)]
    pub empty_input: bool,
}

impl AnalysisResult {
    /// Create a result, clamping confidence into [0, 100]. NaN becomes 0.
    pub fn new(
        sentiment: Sentiment,
        confidence: f64,
        details: BackendDetails,
        model: impl Into<String>,
    ) -> Self {
        Self {
            sentiment,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 100.0)
            },
            details,
            model: model.into(),
            empty_input: false,
        }
    }

    /// The defined result for empty or whitespace-only input.
    ///
    /// No scorer runs for empty input; the result is attributed to the
    /// lexicon backend with zeroed scores.
    pub fn empty_input(model: impl Into<String>) -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
            details: BackendDetails::Lexicon {
                polarity: 0.0,
                subjectivity: 0.0,
            },
            model: model.into(),
            empty_input: true,
        }
    }

    /// Backend that produced this result
    pub fn backend_used(&self) -> Backend {
        self.details.backend()
    }

    /// Lexicon polarity, if the lexicon backend produced this result
    pub fn polarity(&self) -> Option<f64> {
        match self.details {
            BackendDetails::Lexicon { polarity, .. } => Some(polarity),
            BackendDetails::Pretrained { .. } => None,
        }
    }

    /// Lexicon subjectivity, if the lexicon backend produced this result
    pub fn subjectivity(&self) -> Option<f64> {
        match self.details {
            BackendDetails::Lexicon { subjectivity, .. } => Some(subjectivity),
            BackendDetails::Pretrained { .. } => None,
        }
    }

    /// Raw model score, if the pretrained backend produced this result
    pub fn raw_score(&self) -> Option<f64> {
        match self.details {
            BackendDetails::Pretrained { raw_score } => Some(raw_score),
            BackendDetails::Lexicon { .. } => None,
        }
    }
}
