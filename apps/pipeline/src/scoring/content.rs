//! Content-depth comparison — head-to-head judgment, insight-keyword
//! density, and token specificity.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::text::count_occurrences;
use crate::scoring::style::capped_ratio;

const INSIGHT_KEYWORDS: &[&str] = &[
    "trend",
    "shift",
    "transformation",
    "disruption",
    "opportunity",
    "challenge",
    "advantage",
    "strategy",
    "approach",
    "solution",
    "implication",
    "result",
    "consequence",
    "outcome",
    "impact",
];

/// Capitalized words and numeric literals — a proxy for named entities and
/// concrete figures.
static SPECIFICITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b|\b\d+(?:,\d+)*(?:\.\d+)?\b").unwrap());

#[derive(Debug, Clone, Serialize)]
pub struct ContentScores {
    pub head_to_head: f64,
    pub insight_density: f64,
    pub specificity: f64,
    pub novelty: f64,
    pub overall: f64,
}

/// `head_to_head` comes from the external pairwise judge (0.5 fallback);
/// it is reused as the novelty proxy.
pub fn content_depth(candidate: &str, reference: &str, head_to_head: f64) -> ContentScores {
    let cand_insights: usize = INSIGHT_KEYWORDS
        .iter()
        .map(|kw| count_occurrences(candidate, kw))
        .sum();
    let ref_insights: usize = INSIGHT_KEYWORDS
        .iter()
        .map(|kw| count_occurrences(reference, kw))
        .sum();
    let insight_density = capped_ratio(cand_insights, ref_insights);

    let cand_specifics = SPECIFICITY.find_iter(candidate).count();
    let ref_specifics = SPECIFICITY.find_iter(reference).count();
    let specificity = capped_ratio(cand_specifics, ref_specifics);

    let novelty = head_to_head;
    let overall = (head_to_head + insight_density + specificity + novelty) / 4.0;

    ContentScores {
        head_to_head,
        insight_density,
        specificity,
        novelty,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "The transformation is underway.\n\n\
Klarna reduced costs by 66% and the shift created a durable advantage. \
This strategy has a measurable impact on outcomes.";

    #[test]
    fn test_identical_texts_with_neutral_judge() {
        let scores = content_depth(POST, POST, 0.5);
        assert!((scores.insight_density - 1.0).abs() < 1e-9);
        assert!((scores.specificity - 1.0).abs() < 1e-9);
        assert!((scores.overall - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_judge_score_flows_into_head_to_head_and_novelty() {
        let scores = content_depth(POST, POST, 0.9);
        assert_eq!(scores.head_to_head, 0.9);
        assert_eq!(scores.novelty, 0.9);
    }

    #[test]
    fn test_vague_candidate_scores_low_on_specificity() {
        let vague = "things are changing and it matters a lot for everyone involved";
        let scores = content_depth(vague, POST, 0.5);
        assert!(scores.specificity < 0.5);
    }

    #[test]
    fn test_bounded_for_empty_candidate() {
        let scores = content_depth("", POST, 0.5);
        assert!((0.0..=1.0).contains(&scores.overall));
        assert_eq!(scores.insight_density, 0.0);
    }
}
