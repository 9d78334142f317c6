//! Aggregate statistics over the ledger

use crate::entry::HistoryEntry;
use moodring_core::Sentiment;
use serde::Serialize;

/// Sentiment distribution and average confidence.
///
/// Each percentage is `count / total * 100` rounded to 2 decimals on its own,
/// so equal counts always get equal shares and the three sum to 100 within 0.01.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
    pub average_confidence: f64,
}

impl Statistics {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        let mut stats = Self::default();
        let mut confidence_sum = 0.0;

        for entry in entries {
            stats.total += 1;
            confidence_sum += entry.confidence;
            match entry.sentiment {
                Sentiment::Positive => stats.positive += 1,
                Sentiment::Negative => stats.negative += 1,
                Sentiment::Neutral => stats.neutral += 1,
            }
        }

        if stats.total == 0 {
            return stats;
        }

        let total = stats.total as f64;
        stats.positive_percentage = round2(stats.positive as f64 / total * 100.0);
        stats.negative_percentage = round2(stats.negative as f64 / total * 100.0);
        stats.neutral_percentage = round2(stats.neutral as f64 / total * 100.0);
        stats.average_confidence = round2(confidence_sum / stats.total as f64);
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodring_core::{AnalysisResult, BackendDetails};

    fn entry(sentiment: Sentiment, confidence: f64) -> HistoryEntry {
        let result = AnalysisResult::new(
            sentiment,
            confidence,
            BackendDetails::Pretrained { raw_score: confidence / 100.0 },
            "mock",
        );
        HistoryEntry::capture("text", &result)
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::from_entries(std::iter::empty());
        assert_eq!(stats, Statistics::default());
        assert!(stats.is_empty());
        assert_eq!(stats.average_confidence, 0.0);
    }

    #[test]
    fn test_counts_and_percentages() {
        let entries = vec![
            entry(Sentiment::Positive, 80.0),
            entry(Sentiment::Positive, 60.0),
            entry(Sentiment::Negative, 100.0),
            entry(Sentiment::Neutral, 100.0),
        ];
        let stats = Statistics::from_entries(&entries);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 1);
        assert_eq!(stats.neutral, 1);
        assert_eq!(stats.positive_percentage, 50.0);
        assert_eq!(stats.negative_percentage, 25.0);
        assert_eq!(stats.neutral_percentage, 25.0);
        assert_eq!(stats.average_confidence, 85.0);
    }

    #[test]
    fn test_equal_counts_get_equal_shares() {
        let entries = vec![
            entry(Sentiment::Positive, 50.0),
            entry(Sentiment::Negative, 50.0),
            entry(Sentiment::Neutral, 50.0),
        ];
        let stats = Statistics::from_entries(&entries);

        assert_eq!(stats.positive_percentage, 33.33);
        assert_eq!(stats.positive_percentage, stats.negative_percentage);
        assert_eq!(stats.negative_percentage, stats.neutral_percentage);

        let sum = stats.positive_percentage + stats.negative_percentage + stats.neutral_percentage;
        assert!((sum - 100.0).abs() <= 0.01 + 1e-9, "sum was {sum}");
    }

    #[test]
    fn test_two_thirds_rounds_up() {
        let entries = vec![
            entry(Sentiment::Positive, 50.0),
            entry(Sentiment::Positive, 50.0),
            entry(Sentiment::Negative, 50.0),
        ];
        let stats = Statistics::from_entries(&entries);

        assert_eq!(stats.positive_percentage, 66.67);
        assert_eq!(stats.negative_percentage, 33.33);
        assert_eq!(stats.neutral_percentage, 0.0);
    }

    #[test]
    fn test_average_confidence_rounded() {
        let entries = vec![
            entry(Sentiment::Positive, 75.0),
            entry(Sentiment::Positive, 90.0),
            entry(Sentiment::Negative, 35.0),
        ];
        let stats = Statistics::from_entries(&entries);
        assert_eq!(stats.average_confidence, 66.67);
    }

    #[test]
    fn test_single_category_is_100() {
        let stats = Statistics::from_entries(&[entry(Sentiment::Negative, 10.0)]);
        assert_eq!(stats.negative_percentage, 100.0);
        assert_eq!(stats.positive_percentage, 0.0);
    }
}
