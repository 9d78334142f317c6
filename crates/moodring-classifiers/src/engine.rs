//! Sentiment engine: backend selection, normalization and fallback

use crate::classifier::{LexicalScore, ModelScore, ScoreOutput, SentimentScorer};
use crate::lexicon::LexiconScorer;
use crate::model_config::PretrainedConfig;
use crate::pretrained::load_pretrained;
use moodring_core::{AnalysisResult, Backend, BackendDetails, Result, Sentiment};
use tracing::{debug, info, warn};

/// Polarity magnitude above which lexicon output is no longer neutral
pub const NEUTRAL_BAND: f64 = 0.1;

/// Classify a lexicon polarity.
///
/// Neutral confidence measures distance from both poles: 100 at zero
/// polarity, 90 at the band edge.
pub fn classify_polarity(polarity: f64) -> (Sentiment, f64) {
    if polarity > NEUTRAL_BAND {
        (Sentiment::Positive, (polarity * 100.0).min(100.0))
    } else if polarity < -NEUTRAL_BAND {
        (Sentiment::Negative, (polarity.abs() * 100.0).min(100.0))
    } else {
        (Sentiment::Neutral, 100.0 - polarity.abs() * 100.0)
    }
}

/// Classify a pretrained model label. The model's label is trusted as-is.
pub fn classify_label(label: &str, score: f64) -> (Sentiment, f64) {
    let sentiment = if label.eq_ignore_ascii_case("POSITIVE") {
        Sentiment::Positive
    } else if label.eq_ignore_ascii_case("NEGATIVE") {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };
    (sentiment, score * 100.0)
}

/// Outcome of the one-time pretrained model load
pub enum ModelAvailability {
    /// Model loaded and ready to score
    Ready(Box<dyn SentimentScorer>),

    /// Model could not be loaded; permanent for the life of the engine
    Unavailable { reason: String },
}

impl ModelAvailability {
    /// Capture a load outcome
    pub fn from_outcome(outcome: Result<Box<dyn SentimentScorer>>) -> Self {
        match outcome {
            Ok(scorer) => {
                info!("Pretrained backend '{}' ready", scorer.name());
                Self::Ready(scorer)
            }
            Err(e) => {
                warn!("Pretrained backend unavailable, lexicon scorer will serve: {}", e);
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for ModelAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(scorer) => f.debug_tuple("Ready").field(&scorer.name()).finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Selects a backend per request and normalizes its output.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct SentimentEngine {
    lexicon: LexiconScorer,
    pretrained: ModelAvailability,
}

impl SentimentEngine {
    pub fn new(lexicon: LexiconScorer, pretrained: ModelAvailability) -> Self {
        if let ModelAvailability::Ready(scorer) = &pretrained {
            debug_assert_eq!(
                scorer.backend(),
                Backend::Pretrained,
                "scorer '{}' placed in the pretrained slot",
                scorer.name()
            );
        }
        Self {
            lexicon,
            pretrained,
        }
    }

    /// Engine with only the lexicon backend
    pub fn lexicon_only() -> Result<Self> {
        Ok(Self::new(
            LexiconScorer::new()?,
            ModelAvailability::unavailable("pretrained backend not configured"),
        ))
    }

    /// Build the engine, loading the pretrained model if enabled.
    ///
    /// A failed model load does not fail initialization; it leaves the
    /// pretrained backend unavailable.
    pub fn initialize(config: &PretrainedConfig) -> Result<Self> {
        let lexicon = LexiconScorer::new()?;
        let pretrained = if config.enabled {
            ModelAvailability::from_outcome(load_pretrained(config))
        } else {
            ModelAvailability::unavailable("pretrained backend disabled")
        };
        Ok(Self::new(lexicon, pretrained))
    }

    pub fn pretrained_available(&self) -> bool {
        self.pretrained.is_ready()
    }

    pub fn availability(&self) -> &ModelAvailability {
        &self.pretrained
    }

    /// Analyze text with the requested backend. Never fails.
    pub fn analyze(&self, text: &str, requested: Backend) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::empty_input(self.lexicon.name());
        }

        match (requested, &self.pretrained) {
            (Backend::Lexicon, _) => self.analyze_lexical(text),
            (Backend::Pretrained, ModelAvailability::Unavailable { reason }) => {
                debug!("Pretrained backend requested but unavailable ({}), using lexicon", reason);
                metrics::counter!("moodring_backend_fallbacks_total", "reason" => "unavailable")
                    .increment(1);
                self.analyze_lexical(text)
            }
            (Backend::Pretrained, ModelAvailability::Ready(scorer)) => match scorer
                .score(text)
                .and_then(ensure_finite)
            {
                Ok(output) => self.normalize(output, scorer.name()),
                Err(e) => {
                    warn!("Pretrained scoring failed, falling back to lexicon: {}", e);
                    metrics::counter!("moodring_backend_fallbacks_total", "reason" => "error")
                        .increment(1);
                    self.analyze_lexical(text)
                }
            },
        }
    }

    fn analyze_lexical(&self, text: &str) -> AnalysisResult {
        lexical_result(self.lexicon.polarity(text), self.lexicon.name())
    }

    fn normalize(&self, output: ScoreOutput, model: &str) -> AnalysisResult {
        match output {
            ScoreOutput::Lexical(score) => lexical_result(score, model),
            ScoreOutput::Model(ModelScore { label, score }) => {
                let score = score.clamp(0.0, 1.0);
                let (sentiment, confidence) = classify_label(&label, score);
                AnalysisResult::new(
                    sentiment,
                    confidence,
                    BackendDetails::Pretrained { raw_score: score },
                    model,
                )
            }
        }
    }
}

/// Reject outputs carrying NaN or infinite scores
fn ensure_finite(output: ScoreOutput) -> Result<ScoreOutput> {
    let finite = match &output {
        ScoreOutput::Lexical(score) => score.polarity.is_finite() && score.subjectivity.is_finite(),
        ScoreOutput::Model(score) => score.score.is_finite(),
    };
    if finite {
        Ok(output)
    } else {
        Err(moodring_core::Error::scorer(format!(
            "non-finite score in {:?}",
            output
        )))
    }
}

fn lexical_result(score: LexicalScore, model: &str) -> AnalysisResult {
    let (sentiment, confidence) = classify_polarity(score.polarity);
    AnalysisResult::new(
        sentiment,
        confidence,
        BackendDetails::Lexicon {
            polarity: score.polarity,
            subjectivity: score.subjectivity,
        },
        model,
    )
}

impl std::fmt::Debug for SentimentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentEngine")
            .field("lexicon", &self.lexicon.name())
            .field("pretrained", &self.pretrained)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_classify_polarity_branches() {
        let (sentiment, confidence) = classify_polarity(0.75);
        assert_eq!(sentiment, Sentiment::Positive);
        assert_close(confidence, 75.0);

        let (sentiment, confidence) = classify_polarity(-0.35);
        assert_eq!(sentiment, Sentiment::Negative);
        assert_close(confidence, 35.0);

        let (sentiment, confidence) = classify_polarity(0.0);
        assert_eq!(sentiment, Sentiment::Neutral);
        assert_close(confidence, 100.0);

        let (sentiment, confidence) = classify_polarity(-0.05);
        assert_eq!(sentiment, Sentiment::Neutral);
        assert_close(confidence, 95.0);
    }

    #[test]
    fn test_classify_polarity_band_edges_are_neutral() {
        let (sentiment, confidence) = classify_polarity(0.1);
        assert_eq!(sentiment, Sentiment::Neutral);
        assert_close(confidence, 90.0);

        let (sentiment, confidence) = classify_polarity(-0.1);
        assert_eq!(sentiment, Sentiment::Neutral);
        assert_close(confidence, 90.0);
    }

    #[test]
    fn test_classify_polarity_caps_at_100() {
        let (sentiment, confidence) = classify_polarity(1.0);
        assert_eq!(sentiment, Sentiment::Positive);
        assert_close(confidence, 100.0);

        let (sentiment, confidence) = classify_polarity(-1.0);
        assert_eq!(sentiment, Sentiment::Negative);
        assert_close(confidence, 100.0);
    }

    #[test]
    fn test_classify_label_mapping() {
        assert_eq!(classify_label("POSITIVE", 0.9).0, Sentiment::Positive);
        assert_eq!(classify_label("negative", 0.9).0, Sentiment::Negative);
        assert_eq!(classify_label("LABEL_2", 0.9).0, Sentiment::Neutral);
        assert_eq!(classify_label("neutral", 0.9).0, Sentiment::Neutral);
        assert_close(classify_label("POSITIVE", 0.9987).1, 99.87);
    }

    #[test]
    fn test_scenarios() {
        let engine = SentimentEngine::lexicon_only().unwrap();

        let result = engine.analyze("This is amazing!", Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!(result.confidence > 0.0);

        let result = engine.analyze("This is terrible!", Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!(result.confidence > 0.0);

        let result = engine.analyze("", Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert!(result.empty_input);
    }

    #[test]
    fn test_whitespace_is_empty_input_for_both_backends() {
        let engine = SentimentEngine::lexicon_only().unwrap();
        for backend in [Backend::Lexicon, Backend::Pretrained] {
            let result = engine.analyze(" \t\n ", backend);
            assert!(result.empty_input);
            assert_eq!(result.confidence, 0.0);
        }
    }

    #[test]
    fn test_lexicon_result_carries_scores() {
        let engine = SentimentEngine::lexicon_only().unwrap();
        let result = engine.analyze("This is amazing!", Backend::Lexicon);

        assert_eq!(result.backend_used(), Backend::Lexicon);
        assert_eq!(result.model, "lexicon");
        assert_close(result.polarity().unwrap(), 0.75);
        assert_close(result.subjectivity().unwrap(), 0.9);
        assert_close(result.confidence, 75.0);
        assert!(!result.empty_input);
    }

    #[test]
    fn test_disabled_pretrained_falls_back() {
        let engine = SentimentEngine::initialize(&PretrainedConfig::default()).unwrap();
        assert!(!engine.pretrained_available());

        let result = engine.analyze("This is not good.", Backend::Pretrained);
        assert_eq!(result.backend_used(), Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_close(result.confidence, 35.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pretrained slot")]
    fn test_lexicon_scorer_rejected_in_pretrained_slot() {
        let _ = SentimentEngine::new(
            LexiconScorer::new().unwrap(),
            ModelAvailability::Ready(Box::new(LexiconScorer::new().unwrap())),
        );
    }

    #[test]
    fn test_ensure_finite() {
        let ok = ScoreOutput::Model(ModelScore::new("POSITIVE", 0.9));
        assert!(ensure_finite(ok).is_ok());

        let nan = ScoreOutput::Model(ModelScore::new("POSITIVE", f64::NAN));
        assert!(ensure_finite(nan).is_err());

        let inf = ScoreOutput::Lexical(LexicalScore {
            polarity: f64::INFINITY,
            subjectivity: 0.5,
        });
        assert!(ensure_finite(inf).is_err());
    }

    #[test]
    fn test_failed_load_is_captured_once() {
        let config = PretrainedConfig::from_local("/nonexistent/moodring/model");
        let engine = SentimentEngine::initialize(&config).unwrap();

        assert!(!engine.pretrained_available());
        assert!(matches!(
            engine.availability(),
            ModelAvailability::Unavailable { .. }
        ));
        let result = engine.analyze("great", Backend::Pretrained);
        assert_eq!(result.backend_used(), Backend::Lexicon);
    }
}
