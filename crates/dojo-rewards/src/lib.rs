//! Nihongo DoJo rewards
//!
//! Reward scoring for the particle fill-in task:
//! - Structural format checks over completion text (`FormatChecker`)
//! - Answer and reasoning extraction behind a narrow trait (`AnswerExtractor`)
//! - Partial-credit particle scoring by grammatical category (`ParticleScorer`)
//! - Reasoning quality by named justifications (`ReasoningScorer`)
//!
//! The training loop calls these through [`RewardFunction`], one
//! [`RewardBatch`] at a time, and owns the [`AnswerDistribution`] they update.

pub mod completion;
pub mod delimiters;
pub mod distribution;
pub mod error;
pub mod extract;
pub mod format;
pub mod particle;
pub mod reasoning;
pub mod reward;
pub mod tables;

pub use completion::{Completion, References, RewardBatch, Turn};
pub use delimiters::Delimiters;
pub use distribution::AnswerDistribution;
pub use error::{RewardError, RewardResult};
pub use extract::{AnswerExtractor, RegexExtractor};
pub use format::FormatChecker;
pub use particle::ParticleScorer;
pub use reasoning::ReasoningScorer;
pub use reward::{
    ApproximateFormatReward, ExactFormatReward, ParticleAnswerReward, ReasoningQualityReward, RewardFunction,
    StructureReward, format_reward_functions, particle_reward_functions,
    particle_reward_functions_with,
};
pub use tables::{DEFAULT_PENALTY, FrequencyPenaltyTable, ParticleCategory, ParticleCategoryTable};
