//! Generated text variants and their backend usage metadata.

use serde::{Deserialize, Serialize};

/// Cost/latency accounting attached to a generated variant.
///
/// Opaque to the scoring core — carried through for run records only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationUsage {
    pub cost: f64,
    pub tokens: u32,
    pub latency_seconds: f64,
}

/// One generated text variant, immutable once scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// `<backend>-<strategy>` label, e.g. "claude-technical".
    pub strategy: String,
    pub round: u32,
    pub text: String,
    pub usage: GenerationUsage,
    pub word_count: usize,
}

impl Candidate {
    pub fn new(strategy: String, round: u32, text: String, usage: GenerationUsage) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            strategy,
            round,
            text,
            usage,
            word_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_derived_from_text() {
        let c = Candidate::new(
            "claude-technical".to_string(),
            1,
            "four words of text".to_string(),
            GenerationUsage::default(),
        );
        assert_eq!(c.word_count, 4);
    }
}
