//! Reward functions as the training loop consumes them: one batch in, one
//! score per completion out, in input order.

use crate::completion::RewardBatch;
use crate::delimiters::Delimiters;
use crate::distribution::AnswerDistribution;
use crate::error::RewardResult;
use crate::extract::{AnswerExtractor, RegexExtractor};
use crate::format::FormatChecker;
use crate::particle::ParticleScorer;
use crate::reasoning::ReasoningScorer;
use std::sync::Arc;
use tracing::debug;

pub trait RewardFunction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Exactly `batch.len()` scores. Never fails; malformed items get the
    /// lowest score of the function instead.
    fn score(&self, batch: &RewardBatch, distribution: &mut AnswerDistribution) -> Vec<f64>;
}

/// ±1.0 for the exact structural template.
#[derive(Debug, Clone)]
pub struct ExactFormatReward {
    checker: FormatChecker,
}

impl ExactFormatReward {
    #[must_use]
    pub fn new(checker: FormatChecker) -> Self {
        Self { checker }
    }
}

impl RewardFunction for ExactFormatReward {
    fn name(&self) -> &'static str {
        "exact_format"
    }

    fn score(&self, batch: &RewardBatch, _distribution: &mut AnswerDistribution) -> Vec<f64> {
        let scores: Vec<f64> = batch.texts().map(|t| self.checker.exact_score(t)).collect();
        let matched = scores.iter().filter(|s| **s > 0.0).count();
        debug!(
            batch_size = scores.len(),
            format_rate = rate(matched, scores.len()),
            "exact format check"
        );
        scores
    }
}

#[derive(Debug, Clone)]
pub struct ApproximateFormatReward {
    checker: FormatChecker,
}

impl ApproximateFormatReward {
    #[must_use]
    pub fn new(checker: FormatChecker) -> Self {
        Self { checker }
    }
}

impl RewardFunction for ApproximateFormatReward {
    fn name(&self) -> &'static str {
        "approximate_format"
    }

    fn score(&self, batch: &RewardBatch, _distribution: &mut AnswerDistribution) -> Vec<f64> {
        let scores: Vec<f64> = batch.texts().map(|t| self.checker.approximate_score(t)).collect();
        let clean = scores.iter().filter(|s| **s > 0.0).count();
        debug!(
            batch_size = scores.len(),
            clean_rate = rate(clean, scores.len()),
            "approximate format check"
        );
        scores
    }
}

#[derive(Debug, Clone)]
pub struct StructureReward {
    checker: FormatChecker,
}

impl StructureReward {
    #[must_use]
    pub fn new(checker: FormatChecker) -> Self {
        Self { checker }
    }
}

impl RewardFunction for StructureReward {
    fn name(&self) -> &'static str {
        "strict_structure"
    }

    fn score(&self, batch: &RewardBatch, _distribution: &mut AnswerDistribution) -> Vec<f64> {
        let scores: Vec<f64> = batch.texts().map(|t| self.checker.structure_score(t)).collect();
        let ordered = scores.iter().filter(|s| **s > 0.0).count();
        debug!(
            batch_size = scores.len(),
            ordered_rate = rate(ordered, scores.len()),
            "structure check"
        );
        scores
    }
}

/// Extracts each answer and scores it against the (unwrapped, broadcast)
/// reference. Records every present reference in the distribution; null,
/// blank or padded references count as missing.
pub struct ParticleAnswerReward {
    extractor: Arc<dyn AnswerExtractor>,
    scorer: ParticleScorer,
}

impl ParticleAnswerReward {
    #[must_use]
    pub fn new(extractor: Arc<dyn AnswerExtractor>, scorer: ParticleScorer) -> Self {
        Self { extractor, scorer }
    }
}

impl std::fmt::Debug for ParticleAnswerReward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleAnswerReward").field("scorer", &self.scorer).finish_non_exhaustive()
    }
}

impl RewardFunction for ParticleAnswerReward {
    fn name(&self) -> &'static str {
        "particle_answer"
    }

    fn score(&self, batch: &RewardBatch, distribution: &mut AnswerDistribution) -> Vec<f64> {
        let guesses: Vec<Option<String>> = batch.texts().map(|t| self.extractor.extract(t)).collect();
        let references: Vec<Option<String>> = batch
            .raw_references()
            .iter()
            .map(|r| {
                r.as_deref()
                    .map(|r| self.extractor.unwrap_reference(r))
                    .filter(|r| !r.is_empty())
            })
            .collect();

        let scores = self.scorer.score_pairs(&guesses, &references, distribution);
        debug!(
            batch_size = scores.len(),
            extracted_rate = rate(guesses.iter().filter(|g| g.is_some()).count(), guesses.len()),
            "particle answer check"
        );
        scores
    }
}

pub struct ReasoningQualityReward {
    extractor: Arc<dyn AnswerExtractor>,
    scorer: ReasoningScorer,
}

impl ReasoningQualityReward {
    #[must_use]
    pub fn new(extractor: Arc<dyn AnswerExtractor>) -> Self {
        Self { extractor, scorer: ReasoningScorer::new() }
    }
}

impl std::fmt::Debug for ReasoningQualityReward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningQualityReward").finish_non_exhaustive()
    }
}

impl RewardFunction for ReasoningQualityReward {
    fn name(&self) -> &'static str {
        "reasoning_quality"
    }

    fn score(&self, batch: &RewardBatch, _distribution: &mut AnswerDistribution) -> Vec<f64> {
        let scores: Vec<f64> = batch
            .texts()
            .map(|t| self.scorer.score_span(self.extractor.reasoning(t).as_deref()))
            .collect();
        let justified = scores.iter().filter(|s| **s > 0.0).count();
        debug!(
            batch_size = scores.len(),
            justified_rate = rate(justified, scores.len()),
            "reasoning quality check"
        );
        scores
    }
}

/// Strict structure check, particle answer scorer, reasoning quality scorer.
pub fn particle_reward_functions(delimiters: Delimiters) -> RewardResult<Vec<Box<dyn RewardFunction>>> {
    particle_reward_functions_with(delimiters, ParticleScorer::default())
}

/// [`particle_reward_functions`] with a caller-built particle scorer.
pub fn particle_reward_functions_with(
    delimiters: Delimiters,
    scorer: ParticleScorer,
) -> RewardResult<Vec<Box<dyn RewardFunction>>> {
    let checker = FormatChecker::new(delimiters.clone())?;
    let extractor: Arc<dyn AnswerExtractor> = Arc::new(RegexExtractor::new(delimiters)?);
    let functions: Vec<Box<dyn RewardFunction>> = vec![
        Box::new(StructureReward::new(checker)),
        Box::new(ParticleAnswerReward::new(Arc::clone(&extractor), scorer)),
        Box::new(ReasoningQualityReward::new(extractor)),
    ];
    Ok(functions)
}

/// Exact and approximate format rewards, for tasks scored on structure alone.
pub fn format_reward_functions(delimiters: Delimiters) -> RewardResult<Vec<Box<dyn RewardFunction>>> {
    let checker = FormatChecker::new(delimiters)?;
    let functions: Vec<Box<dyn RewardFunction>> = vec![
        Box::new(ExactFormatReward::new(checker.clone())),
        Box::new(ApproximateFormatReward::new(checker)),
    ];
    Ok(functions)
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
