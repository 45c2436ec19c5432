//! Pulling the answer and reasoning spans out of completion text.
//!
//! Scoring code only sees [`AnswerExtractor`]; the regex-backed
//! implementation here can be swapped without touching it.

use crate::delimiters::Delimiters;
use crate::error::RewardResult;
use regex::Regex;

pub trait AnswerExtractor: Send + Sync {
    /// The trimmed answer span, or `None` when the structure is missing.
    fn extract(&self, text: &str) -> Option<String>;

    /// The reasoning span (untrimmed), or `None` when either marker is missing.
    fn reasoning(&self, text: &str) -> Option<String>;

    /// Bare reference token: the inner answer span when `reference` is itself
    /// wrapped in answer markers, otherwise `reference` trimmed.
    fn unwrap_reference(&self, reference: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct RegexExtractor {
    delimiters: Delimiters,
    /// `reasoning_end … answer_start (capture) answer_end [eos] $`
    answer: Regex,
    reasoning: Regex,
    wrapped_reference: Regex,
}

impl RegexExtractor {
    pub fn new(delimiters: Delimiters) -> RewardResult<Self> {
        delimiters.validate()?;
        let re_end = regex::escape(&delimiters.reasoning_end);
        let ans_start = regex::escape(&delimiters.answer_start);
        let ans_end = regex::escape(&delimiters.answer_end);
        let eos = delimiters.optional_eos_pattern();

        // `m`: `$` also matches at line ends. `s`: `.` crosses newlines.
        let answer = Regex::new(&format!(r"(?ms){re_end}.*?{ans_start}(.+?){ans_end}\s*{eos}\s*$"))?;
        let reasoning = Regex::new(&format!(
            r"(?s){}(.*?){re_end}",
            regex::escape(&delimiters.reasoning_start)
        ))?;
        let wrapped_reference = Regex::new(&format!(r"(?s){ans_start}(.+?){ans_end}"))?;

        Ok(Self { delimiters, answer, reasoning, wrapped_reference })
    }

    #[must_use]
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }
}

impl AnswerExtractor for RegexExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        self.answer
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    fn reasoning(&self, text: &str) -> Option<String> {
        self.reasoning
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn unwrap_reference(&self, reference: &str) -> String {
        if reference.contains(&self.delimiters.answer_start) {
            if let Some(inner) = self.wrapped_reference.captures(reference).and_then(|c| c.get(1)) {
                return inner.as_str().trim().to_string();
            }
        }
        reference.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> RegexExtractor {
        RegexExtractor::new(Delimiters::default()).unwrap()
    }

    #[test]
    fn test_extracts_trimmed_answer() {
        let text = "<reasoning>目的語を表す</reasoning>\n<answer>  を \n</answer>\n";
        assert_eq!(extractor().extract(text).as_deref(), Some("を"));
    }

    #[test]
    fn test_missing_markers_yield_none() {
        let ex = extractor();
        assert_eq!(ex.extract("<reasoning>x<answer>を</answer>"), None);
        assert_eq!(ex.extract("<reasoning>x</reasoning> を"), None);
        assert_eq!(ex.extract("<reasoning>x</reasoning><answer>を"), None);
        assert_eq!(ex.extract(""), None);
    }

    #[test]
    fn test_trailing_text_on_answer_line_rejected() {
        assert_eq!(extractor().extract("</reasoning><answer>を</answer> trailing"), None);
    }

    #[test]
    fn test_answer_on_earlier_line_matches_in_multiline_mode() {
        let text = "</reasoning><answer>に</answer>\nmore text";
        assert_eq!(extractor().extract(text).as_deref(), Some("に"));
    }

    #[test]
    fn test_eos_tolerated() {
        let ex = RegexExtractor::new(Delimiters::default().with_eos("<|eot|>")).unwrap();
        assert_eq!(ex.extract("</reasoning><answer>で</answer><|eot|>").as_deref(), Some("で"));
        assert_eq!(extractor().extract("</reasoning><answer>で</answer><|eot|>"), None);
    }

    #[test]
    fn test_metacharacter_delimiters() {
        let delims = Delimiters {
            reasoning_start: "[[think]]".to_string(),
            reasoning_end: "[[/think]]".to_string(),
            answer_start: "(ans)".to_string(),
            answer_end: "(/ans)".to_string(),
            eos_token: String::new(),
        };
        let ex = RegexExtractor::new(delims).unwrap();
        assert_eq!(ex.extract("[[think]]...[[/think]](ans)が(/ans)").as_deref(), Some("が"));
        assert_eq!(ex.reasoning("[[think]]why[[/think]]").as_deref(), Some("why"));
    }

    #[test]
    fn test_reasoning_span() {
        let ex = extractor();
        assert_eq!(ex.reasoning("<reasoning>\n場所\n</reasoning>").as_deref(), Some("\n場所\n"));
        assert_eq!(ex.reasoning("<reasoning>unterminated"), None);
    }

    #[test]
    fn test_unwrap_reference() {
        let ex = extractor();
        assert_eq!(ex.unwrap_reference("<think>\n…\n</think>\n<answer> を </answer>"), "を");
        assert_eq!(ex.unwrap_reference(" に "), "に");
        assert_eq!(ex.unwrap_reference("<answer></answer>"), "<answer></answer>");
    }
}
