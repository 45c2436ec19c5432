//! Partial-credit scoring of a guessed particle against the reference.

use crate::distribution::AnswerDistribution;
use crate::tables::{FrequencyPenaltyTable, ParticleCategory, ParticleCategoryTable};
use tracing::trace;

pub const ABSENT_SCORE: f64 = -3.0;
pub const EXACT_BASE_SCORE: f64 = 2.0;
/// に/で: locative vs instrumental.
pub const LOCATIVE_INSTRUMENTAL_SCORE: f64 = 0.3;
/// が/を: flips subject and object.
pub const SUBJECT_OBJECT_SCORE: f64 = -0.5;
pub const SAME_CASE_SCORE: f64 = 0.0;
pub const SAME_CATEGORY_SCORE: f64 = 0.5;
pub const CROSS_CATEGORY_SCORE: f64 = -1.5;

#[derive(Debug, Clone, Default)]
pub struct ParticleScorer {
    categories: ParticleCategoryTable,
    penalties: FrequencyPenaltyTable,
}

impl ParticleScorer {
    #[must_use]
    pub fn new(categories: ParticleCategoryTable, penalties: FrequencyPenaltyTable) -> Self {
        Self { categories, penalties }
    }

    #[must_use]
    pub fn categories(&self) -> &ParticleCategoryTable {
        &self.categories
    }

    #[must_use]
    pub fn penalties(&self) -> &FrequencyPenaltyTable {
        &self.penalties
    }

    /// Score one guess. `None` means extraction failed. An empty reference
    /// never matches exactly.
    #[must_use]
    pub fn score_one(&self, guess: Option<&str>, reference: &str) -> f64 {
        let Some(guess) = guess else {
            return ABSENT_SCORE;
        };

        if !reference.is_empty() && guess == reference {
            return EXACT_BASE_SCORE * self.penalties.get(reference);
        }

        match (self.categories.category_of(guess), self.categories.category_of(reference)) {
            (Some(g), Some(r)) if g == r => {
                if g == ParticleCategory::Case {
                    case_confusion_score(guess, reference)
                } else {
                    SAME_CATEGORY_SCORE
                }
            }
            _ => CROSS_CATEGORY_SCORE,
        }
    }

    /// Score parallel guesses and references, recording every present
    /// reference in `distribution` first. A missing reference scores like an
    /// unknown one. Extra items on the longer side are ignored.
    pub fn score_pairs<G, R>(
        &self,
        guesses: &[Option<G>],
        references: &[Option<R>],
        distribution: &mut AnswerDistribution,
    ) -> Vec<f64>
    where
        G: AsRef<str>,
        R: AsRef<str>,
    {
        guesses
            .iter()
            .zip(references)
            .map(|(guess, reference)| {
                let reference: Option<&str> = reference.as_ref().map(|r| r.as_ref());
                let guess: Option<&str> = guess.as_ref().map(|g| g.as_ref());
                if let Some(reference) = reference {
                    distribution.record(reference);
                }
                let score = self.score_one(guess, reference.unwrap_or_default());
                trace!(?guess, ?reference, score, "scored particle");
                score
            })
            .collect()
    }
}

fn case_confusion_score(guess: &str, reference: &str) -> f64 {
    let is_pair = |a: &str, b: &str| (guess == a && reference == b) || (guess == b && reference == a);
    if is_pair("に", "で") {
        LOCATIVE_INSTRUMENTAL_SCORE
    } else if is_pair("が", "を") {
        SUBJECT_OBJECT_SCORE
    } else {
        SAME_CASE_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_decision_order() {
        let s = ParticleScorer::default();
        assert!(approx(s.score_one(None, "を"), -3.0));
        assert!(approx(s.score_one(Some("を"), "を"), 1.8));
        assert!(approx(s.score_one(Some("ね"), "ね"), 2.0));
        assert!(approx(s.score_one(Some("に"), "で"), 0.3));
        assert!(approx(s.score_one(Some("で"), "に"), 0.3));
        assert!(approx(s.score_one(Some("が"), "を"), -0.5));
        assert!(approx(s.score_one(Some("を"), "が"), -0.5));
        assert!(approx(s.score_one(Some("へ"), "に"), 0.0));
        assert!(approx(s.score_one(Some("ね"), "か"), 0.5));
        assert!(approx(s.score_one(Some("が"), "は"), -1.5));
        assert!(approx(s.score_one(Some("犬"), "が"), -1.5));
        assert!(approx(s.score_one(Some("犬"), "猫"), -1.5));
    }

    #[test]
    fn test_empty_reference_never_matches_exactly() {
        let s = ParticleScorer::default();
        assert!(approx(s.score_one(Some(""), ""), -1.5));
        assert!(approx(s.score_one(Some("が"), ""), -1.5));
        assert!(approx(s.score_one(None, ""), -3.0));
    }

    #[test]
    fn test_score_pairs_records_every_reference() {
        let s = ParticleScorer::default();
        let mut dist = AnswerDistribution::new();
        let guesses = [Some("に"), None, Some("を")];
        let refs = [Some("で"), Some("を"), Some("を")];
        let scores = s.score_pairs(&guesses, &refs, &mut dist);
        assert_eq!(scores.len(), 3);
        assert!(approx(scores[0], 0.3));
        assert!(approx(scores[1], -3.0));
        assert!(approx(scores[2], 1.8));
        assert_eq!(dist.count("を"), 2);
        assert_eq!(dist.count("で"), 1);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_missing_reference_is_not_recorded() {
        let s = ParticleScorer::default();
        let mut dist = AnswerDistribution::new();
        let guesses = [Some(""), Some("に"), None];
        let refs: [Option<&str>; 3] = [None, None, None];
        let scores = s.score_pairs(&guesses, &refs, &mut dist);
        assert!(approx(scores[0], -1.5));
        assert!(approx(scores[1], -1.5));
        assert!(approx(scores[2], -3.0));
        assert_eq!(dist.total(), 0);
    }
}
