//! Structural checks on completion text.
//!
//! Three levels of strictness, all pure functions of the text:
//!
//! - [`FormatChecker::matches_exactly`]: the whole completion is the template
//!   `reasoning_start … reasoning_end answer_start … answer_end [eos]`, with
//!   only whitespace between and around the parts.
//! - [`FormatChecker::approximate_score`]: partial credit per closing marker
//!   that occurs exactly once.
//! - [`FormatChecker::structure_score`]: all four markers present and in order.

use crate::delimiters::Delimiters;
use crate::error::RewardResult;
use regex::Regex;

pub const EXACT_MATCH_SCORE: f64 = 1.0;
pub const EXACT_MISS_SCORE: f64 = -1.0;

pub const APPROX_MARKER_SCORE: f64 = 0.25;
pub const APPROX_MARKER_PENALTY: f64 = -0.5;

pub const STRUCTURE_OK_SCORE: f64 = 0.5;
pub const STRUCTURE_ORDER_PENALTY: f64 = -1.0;
pub const STRUCTURE_MISSING_PENALTY: f64 = -0.5;

#[derive(Debug, Clone)]
pub struct FormatChecker {
    delimiters: Delimiters,
    template: Regex,
}

impl FormatChecker {
    pub fn new(delimiters: Delimiters) -> RewardResult<Self> {
        delimiters.validate()?;
        let template = Regex::new(&format!(
            r"(?s)\A\s*{}.*?{}\s*{}.+?{}\s*{}\s*\z",
            regex::escape(&delimiters.reasoning_start),
            regex::escape(&delimiters.reasoning_end),
            regex::escape(&delimiters.answer_start),
            regex::escape(&delimiters.answer_end),
            delimiters.optional_eos_pattern(),
        ))?;
        Ok(Self { delimiters, template })
    }

    #[must_use]
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    #[must_use]
    pub fn matches_exactly(&self, text: &str) -> bool {
        self.template.is_match(text)
    }

    #[must_use]
    pub fn exact_score(&self, text: &str) -> f64 {
        if self.matches_exactly(text) {
            EXACT_MATCH_SCORE
        } else {
            EXACT_MISS_SCORE
        }
    }

    #[must_use]
    pub fn approximate_score(&self, text: &str) -> f64 {
        let d = &self.delimiters;
        [&d.reasoning_end, &d.answer_start, &d.answer_end]
            .into_iter()
            .map(|marker| {
                if text.matches(marker.as_str()).count() == 1 {
                    APPROX_MARKER_SCORE
                } else {
                    APPROX_MARKER_PENALTY
                }
            })
            .sum()
    }

    /// 0.5 when all four markers appear in order (by first occurrence), -1.0
    /// when all appear out of order, otherwise -0.5 per missing marker.
    #[must_use]
    pub fn structure_score(&self, text: &str) -> f64 {
        let d = &self.delimiters;
        let positions = [
            text.find(&d.reasoning_start),
            text.find(&d.reasoning_end),
            text.find(&d.answer_start),
            text.find(&d.answer_end),
        ];

        let missing = positions.iter().filter(|p| p.is_none()).count();
        if missing > 0 {
            return STRUCTURE_MISSING_PENALTY * missing as f64;
        }

        let ordered: Vec<usize> = positions.into_iter().flatten().collect();
        if ordered.windows(2).all(|w| w[0] < w[1]) {
            STRUCTURE_OK_SCORE
        } else {
            STRUCTURE_ORDER_PENALTY
        }
    }
}
