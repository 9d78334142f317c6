//! Mock scorers for testing
//!
//! Stand-ins for the pretrained backend so the engine's selection and
//! fallback policy can be exercised without model weights.

use moodring_classifiers::classifier::{ModelScore, ScoreOutput};
use moodring_classifiers::{LexiconScorer, ModelAvailability, SentimentEngine, SentimentScorer};
use moodring_core::{Backend, Result, Sentiment};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A configurable mock pretrained scorer
pub struct MockScorer {
    name: String,
    label: String,
    score: f64,
    calls: Arc<AtomicU32>,
}

impl MockScorer {
    /// Create a new mock scorer with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: "POSITIVE".to_string(),
            score: 0.9,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Set the label this scorer will return
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Set the score this scorer will return
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Shared call counter, still readable after the scorer is moved into an engine
    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

impl SentimentScorer for MockScorer {
    fn score(&self, text: &str) -> Result<ScoreOutput> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        // Failure injection keyed on content
        if text.contains("FAIL") {
            return Err(moodring_core::Error::scorer("Simulated inference failure"));
        }

        Ok(ScoreOutput::Model(ModelScore::new(
            self.label.clone(),
            self.score,
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        Backend::Pretrained
    }
}

/// A scorer that always fails - for testing error paths
pub struct FailingScorer {
    calls: Arc<AtomicU32>,
}

impl FailingScorer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

impl SentimentScorer for FailingScorer {
    fn score(&self, _text: &str) -> Result<ScoreOutput> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(moodring_core::Error::scorer("Simulated resource exhaustion"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn backend(&self) -> Backend {
        Backend::Pretrained
    }
}

fn engine_with(scorer: impl SentimentScorer + 'static) -> SentimentEngine {
    SentimentEngine::new(
        LexiconScorer::new().unwrap(),
        ModelAvailability::Ready(Box::new(scorer)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretrained_label_and_confidence() {
        let engine = engine_with(MockScorer::new("mock").with_label("NEGATIVE").with_score(0.97));

        let result = engine.analyze("whatever the model says", Backend::Pretrained);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!((result.confidence - 97.0).abs() < 1e-9);
        assert_eq!(result.backend_used(), Backend::Pretrained);
        assert_eq!(result.raw_score(), Some(0.97));
        assert_eq!(result.model, "mock");
        assert!(result.polarity().is_none());
    }

    #[test]
    fn test_pretrained_label_trusted_without_threshold() {
        // A barely-confident label is still taken as-is
        let engine = engine_with(MockScorer::new("mock").with_label("POSITIVE").with_score(0.51));

        let result = engine.analyze("meh", Backend::Pretrained);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!((result.confidence - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_label_maps_to_neutral() {
        let engine = engine_with(MockScorer::new("mock").with_label("LABEL_1").with_score(0.8));

        let result = engine.analyze("text", Backend::Pretrained);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_transient_failure_falls_back_for_that_call_only() {
        let scorer = MockScorer::new("mock");
        let calls = scorer.calls();
        let engine = engine_with(scorer);

        let result = engine.analyze("FAIL but this is terrible!", Backend::Pretrained);
        assert_eq!(result.backend_used(), Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Negative);

        let result = engine.analyze("this works", Backend::Pretrained);
        assert_eq!(result.backend_used(), Backend::Pretrained);

        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_non_finite_score_falls_back_to_lexicon() {
        for bad in [f64::NAN, f64::INFINITY] {
            let scorer = MockScorer::new("mock").with_score(bad);
            let calls = scorer.calls();
            let engine = engine_with(scorer);

            let result = engine.analyze("This is amazing!", Backend::Pretrained);
            assert_eq!(result.backend_used(), Backend::Lexicon);
            assert_eq!(result.sentiment, Sentiment::Positive);
            assert!((0.0..=100.0).contains(&result.confidence));
            assert_eq!(calls.load(Ordering::Relaxed), 1);
        }
    }

    #[test]
    fn test_failing_backend_is_not_retried() {
        let scorer = FailingScorer::new();
        let calls = scorer.calls();
        let engine = engine_with(scorer);

        let result = engine.analyze("This is amazing!", Backend::Pretrained);
        assert_eq!(result.backend_used(), Backend::Lexicon);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_lexicon_request_never_touches_pretrained() {
        let scorer = MockScorer::new("mock");
        let calls = scorer.calls();
        let engine = engine_with(scorer);

        let result = engine.analyze("good", Backend::Lexicon);
        assert_eq!(result.backend_used(), Backend::Lexicon);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_empty_input_skips_scorers() {
        let scorer = MockScorer::new("mock");
        let calls = scorer.calls();
        let engine = engine_with(scorer);

        let result = engine.analyze("   ", Backend::Pretrained);
        assert!(result.empty_input);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_unavailable_pretrained_uses_lexicon() {
        let engine = SentimentEngine::new(
            LexiconScorer::new().unwrap(),
            ModelAvailability::unavailable("weights missing"),
        );

        for text in ["This is amazing!", "This is terrible!", "It arrived."] {
            let result = engine.analyze(text, Backend::Pretrained);
            assert_eq!(result.backend_used(), Backend::Lexicon);
        }
    }

    #[test]
    fn test_unrecognized_backend_name_is_lexicon() {
        let engine = engine_with(MockScorer::new("mock"));

        let result = engine.analyze("good", Backend::from_name("vader"));
        assert_eq!(result.backend_used(), Backend::Lexicon);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = Arc::new(engine_with(MockScorer::new("mock")));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let backend = if i % 2 == 0 {
                        Backend::Lexicon
                    } else {
                        Backend::Pretrained
                    };
                    engine.analyze("This is amazing!", backend).sentiment
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Sentiment::Positive);
        }
    }
}
