//! Fixed catalog of prompt-optimization directives.
//!
//! Each directive targets one score dimension and carries typed
//! applicability conditions evaluated against the current round's mean
//! scores. The catalog is matched, never mutated.

use crate::models::comparison::Dimension;

/// Applicability condition: fires when the dimension's mean sits below the
/// threshold.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub dimension: Dimension,
    pub below: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OptimizationDirective {
    pub name: &'static str,
    pub description: &'static str,
    pub target: Dimension,
    pub instruction: &'static str,
    pub base_priority: f64,
    pub conditions: &'static [Condition],
}

/// A catalog directive selected for the next round, with its priority
/// adjusted by the observed deficiency weight.
#[derive(Debug, Clone, Copy)]
pub struct SelectedDirective {
    pub directive: &'static OptimizationDirective,
    pub adjusted_priority: f64,
}

pub static CATALOG: [OptimizationDirective; 6] = [
    OptimizationDirective {
        name: "enhance_data_integration",
        description: "Improve specific data point usage and company examples",
        target: Dimension::DataUsageMatch,
        instruction: "\
ENHANCED DATA REQUIREMENTS:
- MUST include at least 3 specific, quantified data points
- Use real company examples with exact metrics
- Include comparative data (e.g. \"3x faster than\", \"50% more efficient\")
- Cite recent studies or reports when possible
- Replace vague terms with specific numbers",
        base_priority: 0.9,
        conditions: &[Condition {
            dimension: Dimension::DataUsageMatch,
            below: 0.7,
        }],
    },
    OptimizationDirective {
        name: "strengthen_voice_authenticity",
        description: "Enhance the analytical voice characteristics",
        target: Dimension::VoiceAuthenticity,
        instruction: "\
VOICE ENHANCEMENT:
- Use analytical confidence: state insights as established facts
- Include practical business implications for every major point
- Reference specific technology trends and market shifts
- Write from an insider perspective with access to industry data
- Balance technical sophistication with business accessibility
- Use present tense for active trends, future tense for predictions",
        base_priority: 0.85,
        conditions: &[
            Condition {
                dimension: Dimension::VoiceAuthenticity,
                below: 0.75,
            },
            Condition {
                dimension: Dimension::StyleSimilarity,
                below: 0.7,
            },
        ],
    },
    OptimizationDirective {
        name: "improve_structural_flow",
        description: "Optimize paragraph structure and transitions",
        target: Dimension::StructuralMatch,
        instruction: "\
ENHANCED STRUCTURE GUIDELINES:
- First paragraph: single powerful statement (under 12 words)
- Second paragraph: provocative question or contrarian observation
- Body paragraphs: alternate between 2-sentence and 3-sentence paragraphs
- Use specific transition phrases: \"However\", \"More importantly\", \"The result\"
- Each paragraph should advance the core argument progressively
- Conclusion: forward-looking statement that reinforces competitive advantage",
        base_priority: 0.8,
        conditions: &[Condition {
            dimension: Dimension::StructuralMatch,
            below: 0.7,
        }],
    },
    OptimizationDirective {
        name: "deepen_insight_quality",
        description: "Enhance content depth and novelty",
        target: Dimension::ContentDepth,
        instruction: "\
INSIGHT DEPTH ENHANCEMENT:
- Lead with non-obvious industry observations
- Connect seemingly unrelated trends to business outcomes
- Include specific market timing analysis (\"why now\")
- Provide tactical implementation guidance
- Challenge conventional wisdom with supporting evidence",
        base_priority: 0.75,
        conditions: &[Condition {
            dimension: Dimension::ContentDepth,
            below: 0.7,
        }],
    },
    OptimizationDirective {
        name: "strengthen_opening_hook",
        description: "Improve opening paragraph effectiveness",
        target: Dimension::HookEffectiveness,
        instruction: "\
POWERFUL OPENING REQUIREMENTS:
- First sentence: bold, contrarian, or surprising statement
- Under 10 words for maximum impact
- Must immediately establish stakes or urgency
- Avoid generic industry observations",
        base_priority: 0.7,
        conditions: &[Condition {
            dimension: Dimension::HookEffectiveness,
            below: 0.6,
        }],
    },
    OptimizationDirective {
        name: "enhance_conclusion_impact",
        description: "Strengthen conclusion effectiveness",
        target: Dimension::ConclusionStrength,
        instruction: "\
IMPACTFUL CONCLUSION REQUIREMENTS:
- Tie directly back to the opening hook
- Provide a specific competitive advantage prediction
- Include actionable next steps or a timeline
- Use confident future-oriented language
- End with a business implication, not a summary",
        base_priority: 0.65,
        conditions: &[Condition {
            dimension: Dimension::ConclusionStrength,
            below: 0.6,
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_entries() {
        assert_eq!(CATALOG.len(), 6);
    }

    #[test]
    fn test_every_directive_condition_targets_its_dimension() {
        for directive in &CATALOG {
            assert!(
                directive.conditions.iter().any(|c| c.dimension == directive.target),
                "{} has no condition on its own target",
                directive.name
            );
        }
    }

    #[test]
    fn test_priorities_descend_through_catalog() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].base_priority >= pair[1].base_priority);
        }
    }
}
