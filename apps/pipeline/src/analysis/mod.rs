//! Style Corpus Analyzer — scans reference posts and extracts the
//! structural statistics the generator targets and the scorer compares
//! against.
//!
//! Flow: fetch corpus entries → per-document structure/topic/data-point
//! analysis → aggregate into a `StyleProfile`. A document with empty
//! content is skipped, never fatal; only an entirely unusable corpus is.

pub mod patterns;
pub mod text;

use tracing::{info, warn};

use crate::corpus::CorpusEntry;
use crate::errors::PipelineError;
use crate::models::document::{ConclusionType, HookType, ReferenceDocument, StyleProfile};

/// Canonical transition phrases observed across the reference corpus.
/// Treated as constants, not learned.
pub const COMMON_TRANSITIONS: &[&str] = &[
    "However",
    "More importantly",
    "The transformation",
    "This approach",
    "Consider how",
];

pub const HOOK_PATTERNS: &[&str] = &["question_opening", "bold_statement", "trend_observation"];

pub const CONCLUSION_PATTERNS: &[&str] =
    &["future_prediction", "competitive_advantage", "transformation_summary"];

pub const VOICE_CHARACTERISTICS: &[&str] =
    &["analytical", "data-driven", "practical", "forward-looking", "confident"];

/// Analyzer output: the aggregated profile plus the analyzed reference set.
#[derive(Debug, Clone)]
pub struct CorpusAnalysis {
    pub profile: StyleProfile,
    pub documents: Vec<ReferenceDocument>,
    pub skipped: usize,
}

/// Analyzes up to `count` corpus entries into a `StyleProfile` and the
/// reference documents used for downstream comparison.
pub fn analyze_corpus(entries: &[CorpusEntry], count: usize) -> Result<CorpusAnalysis, PipelineError> {
    let mut documents = Vec::new();
    let mut skipped = 0usize;

    for entry in entries.iter().take(count) {
        match analyze_document(entry) {
            Some(doc) => documents.push(doc),
            None => {
                warn!("Skipping unparseable document: {}", entry.title);
                skipped += 1;
            }
        }
    }

    if documents.is_empty() {
        return Err(PipelineError::EmptyCorpus);
    }
    if skipped > 0 {
        info!("Corpus analysis skipped {skipped} unusable documents");
    }

    let profile = build_profile(&documents);
    info!(
        "Analyzed {} documents: avg_paragraph_length={:.1}, data_points_per_doc={:.1}",
        documents.len(),
        profile.avg_paragraph_length,
        profile.data_points_per_doc
    );

    Ok(CorpusAnalysis {
        profile,
        documents,
        skipped,
    })
}

/// Analyzes a single entry. Returns `None` for content that cannot be used
/// (empty or whitespace-only).
fn analyze_document(entry: &CorpusEntry) -> Option<ReferenceDocument> {
    let content = entry.text.trim();
    if content.is_empty() {
        return None;
    }

    let paragraphs = text::paragraphs(content);
    let hook_type = classify_hook(paragraphs.first().copied().unwrap_or(""));
    let conclusion_type = classify_conclusion(paragraphs.last().copied().unwrap_or(""));

    Some(ReferenceDocument {
        title: entry.title.clone(),
        url: entry.url.clone(),
        content: content.to_string(),
        date: entry.date.clone(),
        word_count: text::word_count(content),
        paragraph_count: paragraphs.len(),
        data_points: patterns::extract_data_points(content),
        topic_tags: patterns::extract_topics(content),
        hook_type,
        conclusion_type,
    })
}

fn classify_hook(opening: &str) -> HookType {
    if opening.contains('?') {
        HookType::Question
    } else {
        HookType::Statement
    }
}

fn classify_conclusion(closing: &str) -> ConclusionType {
    if patterns::contains_future_keyword(closing) {
        ConclusionType::ForwardLooking
    } else {
        ConclusionType::Summary
    }
}

fn build_profile(documents: &[ReferenceDocument]) -> StyleProfile {
    let n = documents.len() as f64;

    let avg_paragraph_length = documents
        .iter()
        .filter(|d| d.paragraph_count > 0)
        .map(|d| d.word_count as f64 / d.paragraph_count as f64)
        .sum::<f64>()
        / n;

    let avg_sentence_length = documents
        .iter()
        .map(|d| {
            let sentences = text::sentences(&d.content);
            text::avg_words(&sentences)
        })
        .sum::<f64>()
        / n;

    let avg_word_count = documents.iter().map(|d| d.word_count as f64).sum::<f64>() / n;
    let data_points_per_doc =
        documents.iter().map(|d| d.data_points.len() as f64).sum::<f64>() / n;

    let mut topic_distribution = std::collections::BTreeMap::new();
    for doc in documents {
        for tag in &doc.topic_tags {
            *topic_distribution.entry(tag.clone()).or_insert(0u32) += 1;
        }
    }

    StyleProfile {
        avg_paragraph_length,
        avg_sentence_length,
        avg_word_count,
        data_points_per_doc,
        common_transitions: COMMON_TRANSITIONS.iter().map(|s| s.to_string()).collect(),
        hook_patterns: HOOK_PATTERNS.iter().map(|s| s.to_string()).collect(),
        conclusion_patterns: CONCLUSION_PATTERNS.iter().map(|s| s.to_string()).collect(),
        voice_characteristics: VOICE_CHARACTERISTICS.iter().map(|s| s.to_string()).collect(),
        topic_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, text: &str) -> CorpusEntry {
        CorpusEntry {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
            text: text.to_string(),
            date: "2025-01-15".to_string(),
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_avg_word_count_over_three_documents() {
        let entries = vec![
            entry("A", &words(400)),
            entry("B", &words(500)),
            entry("C", &words(600)),
        ];
        let analysis = analyze_corpus(&entries, 3).unwrap();
        assert!((analysis.profile.avg_word_count - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_question_hook_classified() {
        let e = entry("Q", "What happens when AI writes the post?\n\nIt changes everything.");
        let analysis = analyze_corpus(&[e], 1).unwrap();
        assert_eq!(analysis.documents[0].hook_type, HookType::Question);
    }

    #[test]
    fn test_statement_hook_classified() {
        let e = entry("S", "The landscape is shifting.\n\nFast.");
        let analysis = analyze_corpus(&[e], 1).unwrap();
        assert_eq!(analysis.documents[0].hook_type, HookType::Statement);
    }

    #[test]
    fn test_forward_looking_conclusion_classified() {
        let e = entry("F", "Opening statement.\n\nCompanies will build advantages in 2025.");
        let analysis = analyze_corpus(&[e], 1).unwrap();
        assert_eq!(analysis.documents[0].conclusion_type, ConclusionType::ForwardLooking);
    }

    #[test]
    fn test_summary_conclusion_classified() {
        let e = entry("Su", "Opening statement.\n\nThat was the whole story.");
        let analysis = analyze_corpus(&[e], 1).unwrap();
        assert_eq!(analysis.documents[0].conclusion_type, ConclusionType::Summary);
    }

    #[test]
    fn test_empty_documents_skipped_not_fatal() {
        let entries = vec![entry("Empty", "   "), entry("Ok", "Some real content here.")];
        let analysis = analyze_corpus(&entries, 2).unwrap();
        assert_eq!(analysis.skipped, 1);
        assert_eq!(analysis.documents.len(), 1);
    }

    #[test]
    fn test_entirely_empty_corpus_is_fatal() {
        let entries = vec![entry("Empty", "")];
        assert!(analyze_corpus(&entries, 1).is_err());
    }

    #[test]
    fn test_count_bounds_processing() {
        let entries = vec![
            entry("A", "First document."),
            entry("B", "Second document."),
            entry("C", "Third document."),
        ];
        let analysis = analyze_corpus(&entries, 2).unwrap();
        assert_eq!(analysis.documents.len(), 2);
    }

    #[test]
    fn test_data_points_counted_into_profile() {
        let e = entry(
            "D",
            "Klarna cut costs by 66% while spending $500 per month.\n\nThe shift will continue.",
        );
        let analysis = analyze_corpus(&[e], 1).unwrap();
        assert!(analysis.profile.data_points_per_doc >= 2.0);
    }
}
