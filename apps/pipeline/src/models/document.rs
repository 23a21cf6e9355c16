//! Reference corpus data models — one published post and the aggregated
//! style profile computed over a set of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A published reference post, analyzed once and read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub title: String,
    pub url: String,
    pub content: String,
    pub date: String,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub data_points: Vec<String>,
    pub topic_tags: Vec<String>,
    pub hook_type: HookType,
    pub conclusion_type: ConclusionType,
}

/// Opening-paragraph engagement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    Question,
    Statement,
}

/// Closing-paragraph pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConclusionType {
    ForwardLooking,
    Summary,
}

/// Aggregated writing-style statistics over a reference set.
///
/// Recomputed per analysis run, never patched in place. Consumed by the
/// generator as a target shape and by the report writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleProfile {
    pub avg_paragraph_length: f64,
    pub avg_sentence_length: f64,
    pub avg_word_count: f64,
    pub data_points_per_doc: f64,
    pub common_transitions: Vec<String>,
    pub hook_patterns: Vec<String>,
    pub conclusion_patterns: Vec<String>,
    pub voice_characteristics: Vec<String>,
    pub topic_distribution: BTreeMap<String, u32>,
}
