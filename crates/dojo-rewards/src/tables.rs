//! Static particle lookup tables used by the particle scorer.

use crate::error::{RewardError, RewardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleCategory {
    /// 格助詞
    Case,
    /// 接続助詞
    Conjunctive,
    /// 副助詞 (including は/も)
    Adverbial,
    /// 終助詞
    SentenceFinal,
}

impl ParticleCategory {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Case => "case particle",
            Self::Conjunctive => "conjunctive particle",
            Self::Adverbial => "adverbial particle",
            Self::SentenceFinal => "sentence-final particle",
        }
    }
}

impl std::fmt::Display for ParticleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Order matters: a particle listed under several categories resolves to the
// first one here (e.g. が is a case particle, から is a case particle, でも is
// conjunctive).
const CATEGORIES: &[(ParticleCategory, &[&str])] = &[
    (ParticleCategory::Case, &["が", "を", "に", "へ", "と", "で", "から", "より", "まで", "の", "や"]),
    (
        ParticleCategory::Conjunctive,
        &["ば", "と", "ても", "でも", "けれど", "けれども", "が", "のに", "ので", "から", "し", "て", "ながら", "たり"],
    ),
    (
        ParticleCategory::Adverbial,
        &["は", "も", "こそ", "さえ", "でも", "しか", "まで", "ばかり", "だけ", "ほど", "くらい", "など", "なり", "やら"],
    ),
    (ParticleCategory::SentenceFinal, &["か", "な", "ね", "よ", "わ", "ぞ", "ぜ", "さ", "の", "かな", "かしら"]),
];

/// Ordered `(category, members)` pairs; overlapping membership resolves to
/// the earliest category.
#[derive(Debug, Clone)]
pub struct ParticleCategoryTable {
    entries: Vec<(ParticleCategory, Vec<String>)>,
}

impl ParticleCategoryTable {
    #[must_use]
    pub fn standard() -> Self {
        Self::from_ordered(
            CATEGORIES
                .iter()
                .map(|(cat, members)| (*cat, members.iter().map(|m| (*m).to_string()).collect()))
                .collect(),
        )
    }

    #[must_use]
    pub fn from_ordered(entries: Vec<(ParticleCategory, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// First category containing `particle`.
    #[must_use]
    pub fn category_of(&self, particle: &str) -> Option<ParticleCategory> {
        self.entries
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == particle))
            .map(|(cat, _)| *cat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleCategory, &[String])> {
        self.entries.iter().map(|(cat, members)| (*cat, members.as_slice()))
    }
}

impl Default for ParticleCategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Hand-tuned weights: frequent correct answers earn less, rare ones more.
const PENALTIES: &[(&str, f64)] = &[
    ("が", 0.8),
    ("は", 0.8),
    ("に", 0.85),
    ("を", 0.9),
    ("の", 0.9),
    ("で", 0.95),
    ("と", 1.1),
    ("も", 1.1),
    ("から", 1.2),
    ("へ", 1.3),
    ("まで", 1.3),
    ("より", 1.5),
];

pub const DEFAULT_PENALTY: f64 = 1.0;

/// Multiplicative exact-match weight per reference particle, each in (0, 2).
#[derive(Debug, Clone)]
pub struct FrequencyPenaltyTable {
    weights: HashMap<String, f64>,
}

impl FrequencyPenaltyTable {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            weights: PENALTIES.iter().map(|(p, w)| ((*p).to_string(), *w)).collect(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> RewardResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut weights = HashMap::new();
        for (particle, weight) in pairs {
            let particle = particle.into();
            if !(weight > 0.0 && weight < 2.0) {
                return Err(RewardError::InvalidPenalty { particle, weight });
            }
            weights.insert(particle, weight);
        }
        Ok(Self { weights })
    }

    /// Weight for `particle`, or [`DEFAULT_PENALTY`] when unlisted.
    #[must_use]
    pub fn get(&self, particle: &str) -> f64 {
        self.weights.get(particle).copied().unwrap_or(DEFAULT_PENALTY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(p, w)| (p.as_str(), *w))
    }
}

impl Default for FrequencyPenaltyTable {
    fn default() -> Self {
        Self::standard()
    }
}
