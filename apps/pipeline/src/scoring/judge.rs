//! External judgment services — a pairwise head-to-head judge feeding the
//! content-depth sub-score, and an optional rubric judge whose verdict
//! dominates the overall blend.
//!
//! Both are trait seams so scoring logic can be tested without network
//! calls; the LLM-backed implementations go through `LlmClient`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::llm_client::prompts::{JUDGE_SYSTEM, PAIRWISE_PROMPT_TEMPLATE, RUBRIC_JUDGE_PROMPT_TEMPLATE};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::comparison::JudgeVerdict;

const JUDGE_TEMPERATURE: f32 = 0.0;
const JUDGE_MAX_TOKENS: u32 = 1024;

/// Head-to-head preference judge: `compare(candidate, reference)` returns a
/// score in [0, 1] where 0.5 means equal quality.
#[async_trait]
pub trait PairwiseJudge: Send + Sync {
    async fn compare(&self, candidate: &str, reference: &str) -> Result<f64, LlmError>;
}

/// Rubric judge: scores the candidate against the reference on the full
/// style rubric, returning the normalized score plus free-text feedback.
#[async_trait]
pub trait RubricJudge: Send + Sync {
    async fn judge(&self, candidate: &str, reference: &str) -> Result<JudgeVerdict, LlmError>;
}

static SCORE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Score:\s*(\d+(?:\.\d+)?)").unwrap());

/// Extracts the `Score: NN` line from a judge response and normalizes the
/// 0-100 value to [0, 1].
pub fn parse_score_line(response: &str) -> Option<f64> {
    let capture = SCORE_LINE.captures(response)?;
    let raw: f64 = capture.get(1)?.as_str().parse().ok()?;
    Some((raw / 100.0).clamp(0.0, 1.0))
}

pub struct LlmPairwiseJudge {
    client: LlmClient,
}

impl LlmPairwiseJudge {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PairwiseJudge for LlmPairwiseJudge {
    async fn compare(&self, candidate: &str, reference: &str) -> Result<f64, LlmError> {
        let prompt = PAIRWISE_PROMPT_TEMPLATE
            .replace("{reference}", reference)
            .replace("{candidate}", candidate);
        let response = self
            .client
            .call(&prompt, JUDGE_SYSTEM, JUDGE_TEMPERATURE, JUDGE_MAX_TOKENS)
            .await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_score_line(text).ok_or(LlmError::EmptyContent)
    }
}

pub struct LlmRubricJudge {
    client: LlmClient,
}

impl LlmRubricJudge {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RubricJudge for LlmRubricJudge {
    async fn judge(&self, candidate: &str, reference: &str) -> Result<JudgeVerdict, LlmError> {
        let prompt = RUBRIC_JUDGE_PROMPT_TEMPLATE
            .replace("{reference}", reference)
            .replace("{candidate}", candidate);
        let response = self
            .client
            .call(&prompt, JUDGE_SYSTEM, JUDGE_TEMPERATURE, JUDGE_MAX_TOKENS)
            .await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let score = parse_score_line(text).ok_or(LlmError::EmptyContent)?;
        Ok(JudgeVerdict {
            score,
            feedback: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_line_integer() {
        assert_eq!(parse_score_line("Score: 78\n\nDetails follow."), Some(0.78));
    }

    #[test]
    fn test_parse_score_line_decimal() {
        assert_eq!(parse_score_line("Score: 82.5"), Some(0.825));
    }

    #[test]
    fn test_parse_score_line_clamps_above_100() {
        assert_eq!(parse_score_line("Score: 150"), Some(1.0));
    }

    #[test]
    fn test_parse_score_line_missing() {
        assert_eq!(parse_score_line("No numeric verdict here."), None);
    }

    #[test]
    fn test_parse_score_line_mid_text() {
        let response = "Assessment complete.\nScore: 64\nStrengths: voice.";
        assert_eq!(parse_score_line(response), Some(0.64));
    }
}
