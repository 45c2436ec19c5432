use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often each reference answer has been scored.
///
/// Diagnostic only: nothing in scoring reads it. Owned by the caller and
/// passed into each reward call; not synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDistribution {
    counts: HashMap<String, u64>,
    total: u64,
}

impl AnswerDistribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, answer: &str) {
        *self.counts.entry(answer.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, answer: &str) -> u64 {
        self.counts.get(answer).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(answer, count)` pairs, most frequent first, ties by answer.
    #[must_use]
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut out: Vec<(&str, u64)> = self.counts.iter().map(|(a, c)| (a.as_str(), *c)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// Share of all recorded answers that were `answer`.
    #[must_use]
    pub fn share(&self, answer: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(answer) as f64 / self.total as f64
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_rank() {
        let mut dist = AnswerDistribution::new();
        for a in ["を", "が", "を", "に", "を", "が"] {
            dist.record(a);
        }
        assert_eq!(dist.total(), 6);
        assert_eq!(dist.count("を"), 3);
        assert_eq!(dist.most_common(), vec![("を", 3), ("が", 2), ("に", 1)]);
        assert!((dist.share("を") - 0.5).abs() < 1e-12);

        dist.reset();
        assert_eq!(dist.total(), 0);
        assert_eq!(dist.share("を"), 0.0);
    }
}
