//! Moodring Classifiers
//!
//! Sentiment scorers and the engine that selects between them.
//!
//! Two backends are available:
//! - Lexicon: deterministic rule-based polarity/subjectivity scoring, always present
//! - Pretrained: DistilBERT sequence classification via Candle, optional
//!
//! The [`SentimentEngine`] normalizes both into an [`AnalysisResult`] and
//! falls back to the lexicon scorer whenever the pretrained model is missing
//! or fails on a given input.
//!
//! [`AnalysisResult`]: moodring_core::AnalysisResult

pub mod classifier;
pub mod engine;
pub mod lexicon;
pub mod model_config;
pub mod pretrained;

pub use classifier::{LexicalScore, ModelScore, ScoreOutput, SentimentScorer};
pub use engine::{classify_label, classify_polarity, ModelAvailability, SentimentEngine};
pub use lexicon::LexiconScorer;
pub use model_config::{ModelSource, PretrainedConfig};
pub use pretrained::{load_pretrained, truncate_words, MAX_INPUT_TOKENS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ScoreOutput, SentimentScorer};
    pub use crate::engine::{ModelAvailability, SentimentEngine};
    pub use crate::lexicon::LexiconScorer;
    pub use crate::model_config::PretrainedConfig;
    pub use moodring_core::{AnalysisResult, Backend, Sentiment};
}
