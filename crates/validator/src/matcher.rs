//! Fuzzy topic matching for the form-filling assistant.

use padron_core::matcher::{Answer, KnowledgeBase, TextMatcher};
use padron_core::normalize::normalize;
use strsim::normalized_levenshtein;

use crate::config::DEFAULT_MATCH_CUTOFF;

/// Levenshtein-based [`TextMatcher`] over a [`KnowledgeBase`].
///
/// A topic scores the best similarity between its normalized name and
/// either the whole normalized question or any single word of it, so
/// "¿cómo lleno la curp?" still lands on `CURP`.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    knowledge: KnowledgeBase,
    cutoff: f64,
}

impl FuzzyMatcher {
    pub fn new(knowledge: KnowledgeBase, cutoff: f64) -> Self {
        Self { knowledge, cutoff }
    }

    /// Similarity of `query` to `topic` in `[0.0, 1.0]`.
    pub fn score(topic: &str, query: &str) -> f64 {
        let topic = normalize(topic);
        let query = normalize(query);
        if topic.is_empty() || query.is_empty() {
            return 0.0;
        }

        let whole = normalized_levenshtein(&topic, &query);
        query
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|w| !w.is_empty())
            .map(|word| normalized_levenshtein(&topic, word))
            .fold(whole, f64::max)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(KnowledgeBase::default(), DEFAULT_MATCH_CUTOFF)
    }
}

impl TextMatcher for FuzzyMatcher {
    fn best_match(&self, query: &str) -> Option<&Answer> {
        let mut best: Option<(&Answer, f64)> = None;
        for answer in self.knowledge.answers() {
            let score = Self::score(&answer.topic, query);
            if score < self.cutoff {
                continue;
            }
            // Strictly greater keeps the earlier topic on ties.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((answer, score));
            }
        }

        if let Some((answer, score)) = best {
            tracing::debug!(topic = %answer.topic, score, "Knowledge base match");
        }
        best.map(|(answer, _)| answer)
    }
}
