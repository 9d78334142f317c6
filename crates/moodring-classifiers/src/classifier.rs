//! Scorer trait and raw score types

use moodring_core::{Backend, Result};

/// Trait for all sentiment scorers
pub trait SentimentScorer: Send + Sync {
    /// Score the given text
    fn score(&self, text: &str) -> Result<ScoreOutput>;

    /// Get the scorer name
    fn name(&self) -> &str;

    /// Backend this scorer implements
    fn backend(&self) -> Backend;
}

/// Raw output of a scorer, before classification
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutput {
    /// Polarity/subjectivity pair from a lexicon scorer
    Lexical(LexicalScore),

    /// Label/probability pair from a pretrained classifier
    Model(ModelScore),
}

/// Lexicon scorer output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LexicalScore {
    /// Signed polarity in [-1, 1]
    pub polarity: f64,

    /// Subjectivity in [0, 1]
    pub subjectivity: f64,
}

/// Pretrained classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    /// Label as reported by the model (e.g. `POSITIVE`)
    pub label: String,

    /// Probability of `label` in [0, 1]
    pub score: f64,
}

impl ModelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}
