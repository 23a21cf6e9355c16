//! Structural comparison — paragraph shape, length distribution, and
//! hook/conclusion similarity between candidate and reference.

use serde::Serialize;

use crate::analysis::text::{avg_words, closeness, paragraphs, similarity_ratio, word_count};

#[derive(Debug, Clone, Serialize)]
pub struct StructuralScores {
    pub paragraph_count: f64,
    pub word_count: f64,
    pub paragraph_length: f64,
    pub hook_quality: f64,
    pub conclusion_quality: f64,
    pub overall: f64,
}

pub fn structural_comparison(candidate: &str, reference: &str) -> StructuralScores {
    let cand_paras = paragraphs(candidate);
    let ref_paras = paragraphs(reference);

    let paragraph_count_score = closeness(cand_paras.len() as f64, ref_paras.len() as f64);
    let word_count_score = closeness(word_count(candidate) as f64, word_count(reference) as f64);

    let paragraph_length_score = if !cand_paras.is_empty() && !ref_paras.is_empty() {
        closeness(avg_words(&cand_paras), avg_words(&ref_paras))
    } else {
        0.0
    };

    let hook_quality = similarity_ratio(
        cand_paras.first().copied().unwrap_or(""),
        ref_paras.first().copied().unwrap_or(""),
    );
    let conclusion_quality = similarity_ratio(
        cand_paras.last().copied().unwrap_or(""),
        ref_paras.last().copied().unwrap_or(""),
    );

    let overall = (paragraph_count_score
        + word_count_score
        + paragraph_length_score
        + hook_quality
        + conclusion_quality)
        / 5.0;

    StructuralScores {
        paragraph_count: paragraph_count_score,
        word_count: word_count_score,
        paragraph_length: paragraph_length_score,
        hook_quality,
        conclusion_quality,
        overall,
    }
}
