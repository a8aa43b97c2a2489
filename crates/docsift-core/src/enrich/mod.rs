//! Keyword risk scoring and optional entity/summary enrichment.
//!
//! Everything here is a stateless function of text. The heavy lifting -
//! general-purpose entity recognition, summarization - lives behind
//! capability traits implemented by the embedding application; this module
//! only bounds their input, collapses their output, and degrades cleanly
//! when they fail.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::EnrichError;
use crate::models::config::EnrichConfig;
use crate::models::record::{Enrichment, Entity};

/// Capability interface for a general-purpose entity recognizer.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entity spans in a bounded stretch of text.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, EnrichError>;
}

/// Capability interface for a document summarizer.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> Result<String, EnrichError>;
}

/// Derives auxiliary attributes (entities, risk score, summary) from page
/// text. Stateless; `analyze` never fails.
pub struct EnrichmentAnalyzer {
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    config: EnrichConfig,
}

impl EnrichmentAnalyzer {
    pub fn new(config: EnrichConfig) -> Self {
        Self {
            recognizer: None,
            summarizer: None,
            config,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Derive auxiliary attributes from text.
    ///
    /// Collaborator failures degrade to absent attributes; the keyword score
    /// is computed locally and always present.
    pub fn analyze(&self, text: &str) -> Enrichment {
        Enrichment {
            entities: self.entities(text),
            risk_score: self.risk_score(text),
            summary: self.summary(text),
        }
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let Some(recognizer) = &self.recognizer else {
            return Vec::new();
        };

        let bounded = bounded_prefix(text, self.config.entity_text_cap);
        match recognizer.recognize(bounded) {
            Ok(entities) => dedup_entities(entities),
            Err(e) => {
                warn!("entity recognition degraded to empty: {e}");
                Vec::new()
            }
        }
    }

    /// Saturating sum: one weight per keyword hit, capped at 100.
    fn risk_score(&self, text: &str) -> u8 {
        let lowered = text.to_lowercase();
        let hits: usize = self
            .config
            .risk_keywords
            .iter()
            .map(|keyword| lowered.matches(keyword.to_lowercase().as_str()).count())
            .sum();

        hits.saturating_mul(self.config.risk_weight as usize).min(100) as u8
    }

    fn summary(&self, text: &str) -> Option<String> {
        let summarizer = self.summarizer.as_ref()?;

        // Short texts produce degenerate summaries; skip the call entirely.
        if text.split_whitespace().count() <= self.config.summary_min_words {
            return None;
        }

        match summarizer.summarize(text) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("summarization degraded to none: {e}");
                None
            }
        }
    }
}

/// Longest prefix of at most `cap` characters, respecting char boundaries.
fn bounded_prefix(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Collapse duplicate (text, category) pairs, preserving first-seen order.
fn dedup_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|entity| seen.insert(entity.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRecognizer(Vec<Entity>);

    impl EntityRecognizer for FixedRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>, EnrichError> {
            Ok(self.0.clone())
        }
    }

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>, EnrichError> {
            Err(EnrichError::Recognition("model offline".to_string()))
        }
    }

    struct PrefixLengthRecognizer;

    impl EntityRecognizer for PrefixLengthRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<Entity>, EnrichError> {
            Ok(vec![Entity {
                text: text.chars().count().to_string(),
                category: "LEN".to_string(),
            }])
        }
    }

    struct EchoSummarizer;

    impl Summarizer for EchoSummarizer {
        fn summarize(&self, _text: &str) -> Result<String, EnrichError> {
            Ok("a summary".to_string())
        }
    }

    fn entity(text: &str, category: &str) -> Entity {
        Entity {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn risk_score_counts_each_hit_once_per_occurrence() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default());
        let score = analyzer.risk_score("a fine, a court order, and a lawsuit");
        assert_eq!(score, 45);
    }

    #[test]
    fn risk_score_saturates_at_one_hundred() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default());
        let text = "fine court lawsuit ".repeat(4);
        assert_eq!(analyzer.risk_score(&text), 100);
    }

    #[test]
    fn risk_score_matches_arabic_keywords() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default());
        assert_eq!(analyzer.risk_score("صدر حكم من محكمة الاستئناف"), 15);
    }

    #[test]
    fn risk_score_is_zero_for_clean_text() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default());
        assert_eq!(analyzer.risk_score("a perfectly ordinary receipt"), 0);
    }

    #[test]
    fn duplicate_entities_collapse_in_order() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default()).with_recognizer(Arc::new(
            FixedRecognizer(vec![
                entity("Acme", "ORG"),
                entity("Acme", "ORG"),
                entity("Acme", "PERSON"),
            ]),
        ));

        let result = analyzer.analyze("whatever");
        assert_eq!(
            result.entities,
            vec![entity("Acme", "ORG"), entity("Acme", "PERSON")]
        );
    }

    #[test]
    fn recognizer_failure_degrades_to_empty() {
        let analyzer =
            EnrichmentAnalyzer::new(EnrichConfig::default()).with_recognizer(Arc::new(FailingRecognizer));
        let result = analyzer.analyze("some text");
        assert!(result.entities.is_empty());
    }

    #[test]
    fn recognizer_sees_a_bounded_prefix() {
        let mut config = EnrichConfig::default();
        config.entity_text_cap = 10;

        let analyzer =
            EnrichmentAnalyzer::new(config).with_recognizer(Arc::new(PrefixLengthRecognizer));
        let result = analyzer.analyze(&"x".repeat(500));
        assert_eq!(result.entities[0].text, "10");
    }

    #[test]
    fn bounded_prefix_respects_char_boundaries() {
        assert_eq!(bounded_prefix("محكمة", 3), "محك");
        assert_eq!(bounded_prefix("ab", 10), "ab");
    }

    #[test]
    fn summary_gated_on_word_count() {
        let analyzer =
            EnrichmentAnalyzer::new(EnrichConfig::default()).with_summarizer(Arc::new(EchoSummarizer));

        let short = "too short to bother with";
        assert_eq!(analyzer.analyze(short).summary, None);

        let long = "word ".repeat(50);
        assert_eq!(analyzer.analyze(&long).summary, Some("a summary".to_string()));
    }

    #[test]
    fn no_collaborators_still_scores_risk() {
        let analyzer = EnrichmentAnalyzer::new(EnrichConfig::default());
        let result = analyzer.analyze("pay the fine");
        assert_eq!(result.risk_score, 15);
        assert!(result.entities.is_empty());
        assert_eq!(result.summary, None);
    }
}
