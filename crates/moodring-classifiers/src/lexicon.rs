//! Lexicon-based sentiment scorer
//!
//! Scores text by averaging the polarity and subjectivity of known opinion
//! words. Intensifiers and diminishers scale the next opinion word, negators
//! flip and dampen it, and `!` amplifies the most recent one. Clause
//! punctuation resets any pending modifier or negation.

use crate::classifier::{LexicalScore, ScoreOutput, SentimentScorer};
use moodring_core::{Backend, Result};
use regex::Regex;
use std::collections::HashMap;

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    // positive
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("brilliant", 0.9, 1.0),
    ("decent", 0.167, 0.667),
    ("delightful", 1.0, 1.0),
    ("easy", 0.433, 0.833),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("fast", 0.2, 0.6),
    ("fine", 0.417, 0.5),
    ("friendly", 0.375, 0.5),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("helpful", 0.5, 0.5),
    ("impressive", 1.0, 1.0),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("ok", 0.5, 0.5),
    ("okay", 0.5, 0.5),
    ("outstanding", 0.5, 0.6),
    ("perfect", 1.0, 1.0),
    ("perfectly", 1.0, 1.0),
    ("pleased", 0.5, 1.0),
    ("reliable", 0.4, 0.6),
    ("satisfied", 0.5, 1.0),
    ("smooth", 0.4, 0.7),
    ("special", 0.357, 0.571),
    ("superb", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    // near-neutral
    ("adequate", 0.05, 0.35),
    ("average", -0.05, 0.4),
    // negative
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.667),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("buggy", -0.5, 0.6),
    ("confusing", -0.3, 0.7),
    ("difficult", -0.5, 1.0),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("expensive", -0.5, 0.7),
    ("frustrated", -0.7, 0.7),
    ("frustrating", -0.4, 0.7),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("horrible", -1.0, 1.0),
    ("late", -0.3, 0.6),
    ("mediocre", -0.3, 0.6),
    ("overpriced", -0.6, 0.8),
    ("poor", -0.4, 0.6),
    ("rude", -0.3, 0.6),
    ("sad", -0.5, 1.0),
    ("slow", -0.3, 0.4),
    ("terrible", -1.0, 1.0),
    ("unhappy", -0.6, 0.9),
    ("unreliable", -0.5, 0.6),
    ("useless", -0.5, 0.2),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

/// (word, multiplier) applied to the next opinion word
const MODIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("really", 1.3),
    ("super", 1.3),
    ("totally", 1.3),
    ("very", 1.3),
    ("so", 1.2),
    ("quite", 1.1),
    ("fairly", 0.8),
    ("rather", 0.8),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("barely", 0.4),
];

const NEGATORS: &[&str] = &["not", "no", "never", "cannot"];

/// Polarity factor applied to a negated opinion word
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity factor applied by a trailing `!`
const EXCLAMATION_FACTOR: f64 = 1.25;

const TOKEN_PATTERN: &str = r"[a-z]+(?:'[a-z]+)?|[!.,;:?]";

/// Deterministic rule-based scorer
pub struct LexiconScorer {
    name: String,
    tokens: Regex,
    lexicon: HashMap<&'static str, (f64, f64)>,
    modifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Result<Self> {
        Self::with_name("lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| {
            moodring_core::Error::internal(format!("Failed to build lexicon tokenizer: {e}"))
        })?;

        Ok(Self {
            name: name.into(),
            tokens,
            lexicon: LEXICON.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            modifiers: MODIFIERS.iter().copied().collect(),
        })
    }

    /// Score text. Text without any opinion words scores (0, 0).
    pub fn polarity(&self, text: &str) -> LexicalScore {
        let normalized = text.to_lowercase().replace('\u{2019}', "'");

        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut modifier: Option<f64> = None;
        let mut negated = false;

        for token in self.tokens.find_iter(&normalized).map(|m| m.as_str()) {
            match token {
                "!" => {
                    if let Some((polarity, _)) = assessments.last_mut() {
                        *polarity = (*polarity * EXCLAMATION_FACTOR).clamp(-1.0, 1.0);
                    }
                }
                "." | "," | ";" | ":" | "?" => {
                    modifier = None;
                    negated = false;
                }
                word if is_negator(word) => negated = true,
                word => {
                    if let Some(&factor) = self.modifiers.get(word) {
                        modifier = Some(modifier.unwrap_or(1.0) * factor);
                    } else if let Some(&(polarity, subjectivity)) = self.lexicon.get(word) {
                        let factor = modifier.take().unwrap_or(1.0);
                        let mut polarity = polarity * factor;
                        if negated {
                            polarity *= NEGATION_FACTOR;
                            negated = false;
                        }
                        assessments.push((
                            polarity.clamp(-1.0, 1.0),
                            (subjectivity * factor).clamp(0.0, 1.0),
                        ));
                    }
                }
            }
        }

        if assessments.is_empty() {
            return LexicalScore::default();
        }

        let n = assessments.len() as f64;
        LexicalScore {
            polarity: assessments.iter().map(|(p, _)| p).sum::<f64>() / n,
            subjectivity: assessments.iter().map(|(_, s)| s).sum::<f64>() / n,
        }
    }
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<ScoreOutput> {
        Ok(ScoreOutput::Lexical(self.polarity(text)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        Backend::Lexicon
    }
}
