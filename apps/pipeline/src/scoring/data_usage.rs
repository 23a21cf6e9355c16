//! Data-usage comparison — how the candidate's extracted data points stack
//! up against the reference's in count, concreteness, and context.

use serde::Serialize;

use crate::analysis::patterns::extract_data_points;
use crate::analysis::text::closeness;
use crate::scoring::style::capped_ratio;

/// Data points embedded in phrases of at least this many words count as
/// contextual rather than standalone.
const CONTEXTUAL_MIN_WORDS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct DataUsageScores {
    pub count_match: f64,
    pub quality_match: f64,
    pub context_integration: f64,
    pub overall: f64,
}

pub fn data_usage_comparison(candidate: &str, reference: &str) -> DataUsageScores {
    let cand_points = extract_data_points(candidate);
    let ref_points = extract_data_points(reference);

    let count_match = closeness(cand_points.len() as f64, ref_points.len() as f64);

    // A reference with no data points at all gives the quality and context
    // components nothing to match against; they degrade to neutral while
    // the count component carries the penalty.
    let (quality_match, context_integration) = if ref_points.is_empty() {
        (1.0, 1.0)
    } else {
        let digit_bearing = |points: &[String]| points.iter().filter(|p| p.chars().any(|c| c.is_ascii_digit())).count();
        let contextual = |points: &[String]| {
            points
                .iter()
                .filter(|p| p.split_whitespace().count() >= CONTEXTUAL_MIN_WORDS)
                .count()
        };
        (
            capped_ratio(digit_bearing(&cand_points), digit_bearing(&ref_points)),
            capped_ratio(contextual(&cand_points), contextual(&ref_points)),
        )
    };

    let overall = (count_match + quality_match + context_integration) / 3.0;

    DataUsageScores {
        count_match,
        quality_match,
        context_integration,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "Costs fell 66% while an agent runs for $500 per month, a 150x advantage.";

    #[test]
    fn test_identical_texts_score_one() {
        let scores = data_usage_comparison(POST, POST);
        assert!((scores.overall - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_both_sides_empty_is_one() {
        let plain = "No numbers anywhere in this text.";
        let scores = data_usage_comparison(plain, plain);
        assert_eq!(scores.count_match, 1.0);
        assert_eq!(scores.overall, 1.0);
    }

    #[test]
    fn test_candidate_only_data_points_degrade_without_error() {
        let plain = "No numbers anywhere in this text.";
        let scores = data_usage_comparison(POST, plain);
        assert_eq!(scores.count_match, 0.0);
        assert_eq!(scores.quality_match, 1.0);
        assert_eq!(scores.context_integration, 1.0);
        assert!((scores.overall - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_only_data_points_penalized() {
        let plain = "No numbers anywhere in this text.";
        let scores = data_usage_comparison(plain, POST);
        assert_eq!(scores.count_match, 0.0);
        assert_eq!(scores.quality_match, 0.0);
    }
}
