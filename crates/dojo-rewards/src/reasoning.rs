//! Scores the reasoning span by the grammatical justifications it names.

use once_cell::sync::Lazy;
use regex::RegexSet;

pub const MISSING_REASONING_SCORE: f64 = -1.0;
pub const NO_JUSTIFICATION_SCORE: f64 = 0.0;
pub const ONE_JUSTIFICATION_SCORE: f64 = 0.5;
pub const FULL_JUSTIFICATION_SCORE: f64 = 1.0;

/// One entry per justification; each contributes at most once.
const JUSTIFICATION_PATTERNS: &[&str] = &[
    // object of the action
    r"(?:目的語|動作の対象)を(?:表|示)",
    // location
    r"場所を(?:表|示)",
    // means or instrument
    r"(?:手段|道具|方法)を(?:表|示)",
    // direction or destination
    r"(?:方向|目的地)を(?:表|示)",
    // subject
    r"主語を(?:表|示)",
    // topic
    r"主題を(?:表|示)",
    // time
    r"時間を(?:表|示)",
    r"格助詞",
    r"副助詞",
    r"接続助詞",
    r"終助詞",
];

static JUSTIFICATIONS: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(JUSTIFICATION_PATTERNS).expect("justification patterns should be valid"));

#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningScorer;

impl ReasoningScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Number of distinct justification patterns present in `span`.
    #[must_use]
    pub fn count_justifications(&self, span: &str) -> usize {
        JUSTIFICATIONS.matches(span).iter().count()
    }

    /// `None` means the reasoning span could not be extracted.
    #[must_use]
    pub fn score_span(&self, span: Option<&str>) -> f64 {
        match span.map(|s| self.count_justifications(s)) {
            None => MISSING_REASONING_SCORE,
            Some(0) => NO_JUSTIFICATION_SCORE,
            Some(1) => ONE_JUSTIFICATION_SCORE,
            Some(_) => FULL_JUSTIFICATION_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(JUSTIFICATIONS.len(), JUSTIFICATION_PATTERNS.len());
    }

    #[test]
    fn test_score_tiers() {
        let s = ReasoningScorer::new();
        assert_eq!(s.score_span(None), -1.0);
        assert_eq!(s.score_span(Some("")), 0.0);
        assert_eq!(s.score_span(Some("これは場所を表す")), 0.5);
        assert_eq!(s.score_span(Some("格助詞「で」は場所を表す")), 1.0);
        assert_eq!(s.score_span(Some("格助詞で、手段を表す。終助詞ではない")), 1.0);
    }

    #[test]
    fn test_repeated_pattern_counts_once() {
        let s = ReasoningScorer::new();
        let span = "場所を表す。場所を表す。場所を示す。";
        assert_eq!(s.count_justifications(span), 1);
        assert_eq!(s.score_span(Some(span)), 0.5);
    }

    #[test]
    fn test_monotone_in_count() {
        let s = ReasoningScorer::new();
        let spans = ["", "主語を示す", "主語を示す 目的語を表す", "主語を示す 目的語を表す 格助詞"];
        let scores: Vec<f64> = spans.iter().map(|sp| s.score_span(Some(sp))).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores.last().copied(), Some(1.0));
    }
}
