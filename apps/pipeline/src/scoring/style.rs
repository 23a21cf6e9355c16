//! Style similarity — voice-marker pattern density, sentence length, and
//! tone-keyword buckets.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::text::{avg_words, closeness, count_occurrences, sentences};

/// Voice-marker pattern families: contrast connectives, trailing questions,
/// percentages, currency, future-tense verbs.
static VOICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:However|More importantly|The transformation|This approach|Consider how)\b",
        r"\?\s*$",
        r"\d+%",
        r"\$[\d,]+\b",
        r"(?i)\b(?:will|future|next|coming)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const ANALYTICAL_WORDS: &[&str] = &["data", "analysis", "evidence", "research", "study", "results"];
const CONFIDENT_WORDS: &[&str] = &["will", "must", "clearly", "obviously", "demonstrates"];
const PRACTICAL_WORDS: &[&str] = &["implement", "apply", "use", "adopt", "strategy"];

#[derive(Debug, Clone, Serialize)]
pub struct StyleScores {
    pub voice_patterns: f64,
    pub sentence_structure: f64,
    pub tone_match: f64,
    pub overall: f64,
}

pub fn style_similarity(candidate: &str, reference: &str) -> StyleScores {
    let cand_hits: usize = VOICE_PATTERNS.iter().map(|re| re.find_iter(candidate).count()).sum();
    let ref_hits: usize = VOICE_PATTERNS.iter().map(|re| re.find_iter(reference).count()).sum();
    let voice_patterns = capped_ratio(cand_hits, ref_hits);

    let sentence_structure = closeness(
        avg_words(&sentences(candidate)),
        avg_words(&sentences(reference)),
    );

    let tone_match = tone_similarity(candidate, reference);

    let overall = (voice_patterns + sentence_structure + tone_match) / 3.0;

    StyleScores {
        voice_patterns,
        sentence_structure,
        tone_match,
        overall,
    }
}

fn tone_similarity(candidate: &str, reference: &str) -> f64 {
    let buckets = [ANALYTICAL_WORDS, CONFIDENT_WORDS, PRACTICAL_WORDS];
    let mut total = 0.0;
    for bucket in buckets {
        let cand: usize = bucket.iter().map(|w| count_occurrences(candidate, w)).sum();
        let reference_count: usize = bucket.iter().map(|w| count_occurrences(reference, w)).sum();
        total += capped_ratio(cand, reference_count);
    }
    total / buckets.len() as f64
}

/// Hit-count ratio capped at 1.0 — neutral 1.0 when both sides are zero,
/// 0.0 when only the candidate has hits the reference lacks entirely.
pub fn capped_ratio(candidate_count: usize, reference_count: usize) -> f64 {
    if reference_count > 0 {
        (candidate_count as f64 / reference_count as f64).min(1.0)
    } else if candidate_count == 0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "The landscape is shifting.\n\n\
However, the data shows a clear pattern. Companies that apply this strategy will see results.\n\n\
Analysis of the evidence demonstrates a 66% improvement. The future belongs to early adopters?";

    #[test]
    fn test_identical_texts_score_one() {
        let scores = style_similarity(POST, POST);
        assert!((scores.overall - 1.0).abs() < 1e-9);
        assert!((scores.voice_patterns - 1.0).abs() < 1e-9);
        assert!((scores.tone_match - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_capped_ratio_never_exceeds_one() {
        assert_eq!(capped_ratio(10, 2), 1.0);
    }

    #[test]
    fn test_capped_ratio_both_zero_is_neutral() {
        assert_eq!(capped_ratio(0, 0), 1.0);
    }

    #[test]
    fn test_capped_ratio_candidate_only_is_zero() {
        assert_eq!(capped_ratio(3, 0), 0.0);
    }

    #[test]
    fn test_plain_candidate_scores_below_marker_rich_reference() {
        let plain = "Some words here.\n\nMore words follow in a second paragraph.";
        let scores = style_similarity(plain, POST);
        assert!(scores.voice_patterns < 1.0);
        assert!((0.0..=1.0).contains(&scores.overall));
    }

    #[test]
    fn test_empty_sides_bounded() {
        let scores = style_similarity("", "");
        assert!((0.0..=1.0).contains(&scores.overall));
    }
}
