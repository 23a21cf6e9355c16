//! Comparison scoring output models shared across the scorer, the feedback
//! aggregator, and the run records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The eight score dimensions tracked per comparison and averaged per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    OverallSimilarity,
    StructuralMatch,
    StyleSimilarity,
    ContentDepth,
    DataUsageMatch,
    HookEffectiveness,
    ConclusionStrength,
    VoiceAuthenticity,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::OverallSimilarity,
        Dimension::StructuralMatch,
        Dimension::StyleSimilarity,
        Dimension::ContentDepth,
        Dimension::DataUsageMatch,
        Dimension::HookEffectiveness,
        Dimension::ConclusionStrength,
        Dimension::VoiceAuthenticity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::OverallSimilarity => "overall_similarity",
            Dimension::StructuralMatch => "structural_match",
            Dimension::StyleSimilarity => "style_similarity",
            Dimension::ContentDepth => "content_depth",
            Dimension::DataUsageMatch => "data_usage_match",
            Dimension::HookEffectiveness => "hook_effectiveness",
            Dimension::ConclusionStrength => "conclusion_strength",
            Dimension::VoiceAuthenticity => "voice_authenticity",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict from the optional LLM rubric judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeVerdict {
    /// Normalized to [0, 1].
    pub score: f64,
    pub feedback: String,
}

/// Detailed comparison between a generated candidate and a reference post.
///
/// Created once per (candidate, reference) pair; immutable afterward.
/// Every score field lies in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub overall_similarity: f64,
    pub structural_match: f64,
    pub style_similarity: f64,
    pub content_depth: f64,
    pub data_usage_match: f64,
    pub hook_effectiveness: f64,
    pub conclusion_strength: f64,
    pub voice_authenticity: f64,
    /// Deficiency tags for dimensions that fell below their threshold.
    pub improvement_areas: Vec<String>,
    /// Free-text diagnostic notes keyed by category.
    pub specific_feedback: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge: Option<JudgeVerdict>,
}

impl ComparisonResult {
    pub fn dimension(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::OverallSimilarity => self.overall_similarity,
            Dimension::StructuralMatch => self.structural_match,
            Dimension::StyleSimilarity => self.style_similarity,
            Dimension::ContentDepth => self.content_depth,
            Dimension::DataUsageMatch => self.data_usage_match,
            Dimension::HookEffectiveness => self.hook_effectiveness,
            Dimension::ConclusionStrength => self.conclusion_strength,
            Dimension::VoiceAuthenticity => self.voice_authenticity,
        }
    }
}

/// Per-dimension arithmetic means over one round's comparison batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionMeans {
    pub overall_similarity: f64,
    pub structural_match: f64,
    pub style_similarity: f64,
    pub content_depth: f64,
    pub data_usage_match: f64,
    pub hook_effectiveness: f64,
    pub conclusion_strength: f64,
    pub voice_authenticity: f64,
}

impl DimensionMeans {
    /// Averages each dimension across the batch. Empty batches yield zeros.
    pub fn from_results(results: &[ComparisonResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f64;
        let mean = |dim: Dimension| results.iter().map(|r| r.dimension(dim)).sum::<f64>() / n;
        Self {
            overall_similarity: mean(Dimension::OverallSimilarity),
            structural_match: mean(Dimension::StructuralMatch),
            style_similarity: mean(Dimension::StyleSimilarity),
            content_depth: mean(Dimension::ContentDepth),
            data_usage_match: mean(Dimension::DataUsageMatch),
            hook_effectiveness: mean(Dimension::HookEffectiveness),
            conclusion_strength: mean(Dimension::ConclusionStrength),
            voice_authenticity: mean(Dimension::VoiceAuthenticity),
        }
    }

    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::OverallSimilarity => self.overall_similarity,
            Dimension::StructuralMatch => self.structural_match,
            Dimension::StyleSimilarity => self.style_similarity,
            Dimension::ContentDepth => self.content_depth,
            Dimension::DataUsageMatch => self.data_usage_match,
            Dimension::HookEffectiveness => self.hook_effectiveness,
            Dimension::ConclusionStrength => self.conclusion_strength,
            Dimension::VoiceAuthenticity => self.voice_authenticity,
        }
    }
}
