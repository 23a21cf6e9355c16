//! Comparative Scorer — multi-dimensional similarity between a generated
//! candidate and a published reference post.
//!
//! Flow: structural → style → content depth (with pairwise judgment) →
//! data usage → optional rubric judgment → weighted blend → deficiency
//! tagging. Every sub-score and the overall score lie in [0, 1]; degenerate
//! inputs degrade to neutral defaults rather than erroring.

pub mod content;
pub mod data_usage;
pub mod judge;
pub mod structural;
pub mod style;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::comparison::ComparisonResult;
use crate::models::document::ReferenceDocument;
use crate::scoring::judge::{PairwiseJudge, RubricJudge};

// Blend weights when a rubric judgment is available: the judge dominates
// and the four structural families split the remainder.
const JUDGED_WEIGHT_JUDGE: f64 = 0.60;
const JUDGED_WEIGHT_STRUCTURAL: f64 = 0.10;
const JUDGED_WEIGHT_STYLE: f64 = 0.15;
const JUDGED_WEIGHT_CONTENT: f64 = 0.10;
const JUDGED_WEIGHT_DATA: f64 = 0.05;

// Heuristic-only blend weights.
const WEIGHT_STRUCTURAL: f64 = 0.25;
const WEIGHT_STYLE: f64 = 0.30;
const WEIGHT_CONTENT: f64 = 0.25;
const WEIGHT_DATA: f64 = 0.20;

// Deficiency thresholds. Fixed constants, not configurable per call.
const SUBSCORE_THRESHOLD: f64 = 0.7;
const DIAGNOSTIC_THRESHOLD: f64 = 0.6;

/// Fallback head-to-head score when no judge is configured or the call fails.
const NEUTRAL_HEAD_TO_HEAD: f64 = 0.5;

pub struct ComparativeScorer {
    pairwise: Option<Arc<dyn PairwiseJudge>>,
    rubric: Option<Arc<dyn RubricJudge>>,
}

impl ComparativeScorer {
    pub fn new(
        pairwise: Option<Arc<dyn PairwiseJudge>>,
        rubric: Option<Arc<dyn RubricJudge>>,
    ) -> Self {
        Self { pairwise, rubric }
    }

    /// Scores one candidate against one reference. Infallible by design:
    /// judge failures fall back to neutral values and are logged.
    pub async fn score(&self, candidate_text: &str, reference: &ReferenceDocument) -> ComparisonResult {
        debug!("Comparing candidate against: {}", reference.title);

        let head_to_head = match &self.pairwise {
            Some(judge) => match judge.compare(candidate_text, &reference.content).await {
                Ok(score) => score,
                Err(e) => {
                    warn!("Pairwise judgment failed, using neutral fallback: {e}");
                    NEUTRAL_HEAD_TO_HEAD
                }
            },
            None => NEUTRAL_HEAD_TO_HEAD,
        };

        let structural = structural::structural_comparison(candidate_text, &reference.content);
        let style = style::style_similarity(candidate_text, &reference.content);
        let content = content::content_depth(candidate_text, &reference.content, head_to_head);
        let data = data_usage::data_usage_comparison(candidate_text, &reference.content);

        let verdict = match &self.rubric {
            Some(judge) => match judge.judge(candidate_text, &reference.content).await {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Rubric judgment failed, falling back to heuristic blend: {e}");
                    None
                }
            },
            None => None,
        };

        let overall_similarity = match &verdict {
            Some(v) => {
                v.score * JUDGED_WEIGHT_JUDGE
                    + structural.overall * JUDGED_WEIGHT_STRUCTURAL
                    + style.overall * JUDGED_WEIGHT_STYLE
                    + content.overall * JUDGED_WEIGHT_CONTENT
                    + data.overall * JUDGED_WEIGHT_DATA
            }
            None => {
                structural.overall * WEIGHT_STRUCTURAL
                    + style.overall * WEIGHT_STYLE
                    + content.overall * WEIGHT_CONTENT
                    + data.overall * WEIGHT_DATA
            }
        };

        let improvement_areas = tag_deficiencies(
            structural.overall,
            style.overall,
            content.overall,
            data.overall,
            structural.hook_quality,
            structural.conclusion_quality,
        );

        let mut specific_feedback = BTreeMap::new();
        specific_feedback.insert(
            "structural".to_string(),
            format!(
                "Paragraph structure: {:.1}%, Word count alignment: {:.1}%",
                structural.overall * 100.0,
                structural.word_count * 100.0
            ),
        );
        specific_feedback.insert(
            "style".to_string(),
            format!(
                "Voice patterns: {:.1}%, Tone match: {:.1}%",
                style.voice_patterns * 100.0,
                style.tone_match * 100.0
            ),
        );
        specific_feedback.insert(
            "content".to_string(),
            format!(
                "Insight depth: {:.1}%, Specificity: {:.1}%",
                content.insight_density * 100.0,
                content.specificity * 100.0
            ),
        );
        specific_feedback.insert(
            "data".to_string(),
            format!(
                "Data point count: {:.1}%, Quality: {:.1}%",
                data.count_match * 100.0,
                data.quality_match * 100.0
            ),
        );

        ComparisonResult {
            overall_similarity,
            structural_match: structural.overall,
            style_similarity: style.overall,
            content_depth: content.overall,
            data_usage_match: data.overall,
            hook_effectiveness: structural.hook_quality,
            conclusion_strength: structural.conclusion_quality,
            voice_authenticity: style.tone_match,
            improvement_areas,
            specific_feedback,
            judge: verdict,
        }
    }
}

fn tag_deficiencies(
    structural: f64,
    style: f64,
    content: f64,
    data: f64,
    hook: f64,
    conclusion: f64,
) -> Vec<String> {
    let mut areas = Vec::new();
    if structural < SUBSCORE_THRESHOLD {
        areas.push("structure_flow".to_string());
    }
    if style < SUBSCORE_THRESHOLD {
        areas.push("voice_authenticity".to_string());
    }
    if content < SUBSCORE_THRESHOLD {
        areas.push("insight_depth".to_string());
    }
    if data < SUBSCORE_THRESHOLD {
        areas.push("data_integration".to_string());
    }
    if hook < DIAGNOSTIC_THRESHOLD {
        areas.push("opening_hook".to_string());
    }
    if conclusion < DIAGNOSTIC_THRESHOLD {
        areas.push("conclusion_impact".to_string());
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::analysis::analyze_corpus;
    use crate::corpus::{CorpusEntry, CorpusSource, SampleCorpus};
    use crate::llm_client::LlmError;
    use crate::models::comparison::JudgeVerdict;

    fn sample_reference() -> ReferenceDocument {
        let entries = SampleCorpus.fetch(1).unwrap();
        analyze_corpus(&entries, 1).unwrap().documents.remove(0)
    }

    fn reference_from(text: &str) -> ReferenceDocument {
        let entry = CorpusEntry {
            title: "Test".to_string(),
            url: "https://example.com/test".to_string(),
            text: text.to_string(),
            date: "2025-01-15".to_string(),
        };
        analyze_corpus(&[entry], 1).unwrap().documents.remove(0)
    }

    struct FixedJudge(f64);

    #[async_trait]
    impl PairwiseJudge for FixedJudge {
        async fn compare(&self, _candidate: &str, _reference: &str) -> Result<f64, LlmError> {
            Ok(self.0)
        }
    }

    struct ErroringJudge;

    #[async_trait]
    impl PairwiseJudge for ErroringJudge {
        async fn compare(&self, _candidate: &str, _reference: &str) -> Result<f64, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    struct FixedRubric(f64);

    #[async_trait]
    impl RubricJudge for FixedRubric {
        async fn judge(&self, _candidate: &str, _reference: &str) -> Result<JudgeVerdict, LlmError> {
            Ok(JudgeVerdict {
                score: self.0,
                feedback: "fixed".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_all_scores_bounded() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = sample_reference();
        for candidate in [
            "",
            "One short line.",
            "However, 66% of the $500 budget will shift.\n\nThe strategy demonstrates results?",
        ] {
            let result = scorer.score(candidate, &reference).await;
            for v in [
                result.overall_similarity,
                result.structural_match,
                result.style_similarity,
                result.content_depth,
                result.data_usage_match,
                result.hook_effectiveness,
                result.conclusion_strength,
                result.voice_authenticity,
            ] {
                assert!((0.0..=1.0).contains(&v), "score out of bounds: {v}");
            }
        }
    }

    #[tokio::test]
    async fn test_self_comparison_near_perfect() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = sample_reference();
        let result = scorer.score(&reference.content.clone(), &reference).await;
        assert!(result.structural_match >= 0.95);
        assert!(result.style_similarity >= 0.95);
        assert!(result.data_usage_match >= 0.95);
    }

    #[tokio::test]
    async fn test_self_comparison_overall_high_and_clean() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = sample_reference();
        let result = scorer.score(&reference.content.clone(), &reference).await;
        assert!(result.overall_similarity >= 0.9);
        assert!(
            result.improvement_areas.is_empty(),
            "unexpected deficiencies: {:?}",
            result.improvement_areas
        );
    }

    #[tokio::test]
    async fn test_rubric_verdict_dominates_blend() {
        let reference = sample_reference();
        let candidate = reference.content.clone();

        let without = ComparativeScorer::new(None, None)
            .score(&candidate, &reference)
            .await;
        let with = ComparativeScorer::new(None, Some(Arc::new(FixedRubric(0.1)) as Arc<dyn RubricJudge>))
            .score(&candidate, &reference)
            .await;

        // A low judge verdict at 60% weight pulls a near-perfect heuristic
        // blend well down.
        assert!(with.overall_similarity < without.overall_similarity - 0.3);
        assert!(with.judge.is_some());
    }

    #[tokio::test]
    async fn test_pairwise_failure_falls_back_to_neutral() {
        let reference = sample_reference();
        let erroring = ComparativeScorer::new(Some(Arc::new(ErroringJudge) as Arc<dyn PairwiseJudge>), None)
            .score(&reference.content.clone(), &reference)
            .await;
        let neutral = ComparativeScorer::new(None, None)
            .score(&reference.content.clone(), &reference)
            .await;
        assert!((erroring.content_depth - neutral.content_depth).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_pairwise_judge_raises_content_depth() {
        let reference = sample_reference();
        let low = ComparativeScorer::new(Some(Arc::new(FixedJudge(0.0)) as Arc<dyn PairwiseJudge>), None)
            .score(&reference.content.clone(), &reference)
            .await;
        let high = ComparativeScorer::new(Some(Arc::new(FixedJudge(1.0)) as Arc<dyn PairwiseJudge>), None)
            .score(&reference.content.clone(), &reference)
            .await;
        assert!(high.content_depth > low.content_depth);
    }

    #[tokio::test]
    async fn test_poor_candidate_gets_deficiency_tags() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = sample_reference();
        let result = scorer.score("A few unrelated words.", &reference).await;
        assert!(result.improvement_areas.contains(&"structure_flow".to_string()));
        assert!(result.improvement_areas.contains(&"opening_hook".to_string()));
    }

    #[tokio::test]
    async fn test_zero_data_both_sides_scores_one() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = reference_from("Plain prose without numbers.\n\nStill no figures anywhere.");
        let result = scorer
            .score("Plain prose without numbers.\n\nStill no figures anywhere.", &reference)
            .await;
        assert!((result.data_usage_match - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_specific_feedback_categories_present() {
        let scorer = ComparativeScorer::new(None, None);
        let reference = sample_reference();
        let result = scorer.score("Some candidate text.", &reference).await;
        for key in ["structural", "style", "content", "data"] {
            assert!(result.specific_feedback.contains_key(key));
        }
    }
}
