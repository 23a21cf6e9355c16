//! Generation prompt construction: the base style guide derived from the
//! corpus profile, and the per-strategy round prompts built on top of it.

use crate::generation::strategies::Strategy;
use crate::models::document::StyleProfile;

/// Style-guide template. Replace `{word_target}`, `{paragraph_target}`,
/// `{data_points_target}`, `{transitions}`, and `{voice}` before use.
const STYLE_GUIDE_TEMPLATE: &str = r#"Write in a precise analytical style with these CRITICAL requirements:

FORMATTING REQUIREMENTS:
- Approximately {word_target} words
- First sentence: Must be its own standalone paragraph
- Second sentence: Must be its own standalone paragraph and contain either a provoking statement OR a question
- NO section headers - write as continuous flowing prose only
- Target paragraph length: around {paragraph_target} words per paragraph
- NEVER use adverbs (words ending in -ly)
- Each paragraph should transition smoothly to the next

STYLE CHARACTERISTICS:
- Channel these voice characteristics: {voice}
- Include {data_points_target} specific data points or statistics from real sources
- Use concrete examples from real companies
- Use transition phrases such as: {transitions}
- Avoid business cliches
- Write concisely and directly - every word counts

CRITICAL DATA REQUIREMENTS:
- DO NOT hallucinate or invent any statistics, percentages, or data points
- Only use data points that you are certain about
- It's better to say "significant" or "substantial" than to invent a specific percentage

CONCLUSION:
- End with a forward-looking statement that reinforces competitive advantage"#;

/// Builds the base style guide from the analyzed corpus profile.
pub fn style_guide(profile: &StyleProfile) -> String {
    STYLE_GUIDE_TEMPLATE
        .replace("{word_target}", &format!("{:.0}", profile.avg_word_count))
        .replace(
            "{paragraph_target}",
            &format!("{:.0}", profile.avg_paragraph_length),
        )
        .replace(
            "{data_points_target}",
            &format!("{:.0}", profile.data_points_per_doc.max(2.0)),
        )
        .replace("{transitions}", &profile.common_transitions.join(", "))
        .replace("{voice}", &profile.voice_characteristics.join(", "))
}

/// Builds the full prompt for one (strategy, round) generation unit.
///
/// `guide` is the base style guide on round 1 and the feedback-optimized
/// prompt on later rounds.
pub fn build_generation_prompt(topic: &str, strategy: &Strategy, round: u32, guide: &str) -> String {
    match round {
        0 | 1 => format!(
            "{}: {topic}\n\n{guide}\n\nFocus on practical insights that startup founders and investors can apply immediately.",
            strategy.prefix
        ),
        2 => format!(
            "{}: {topic}\n\nImprove by:\n- Strengthening the argument with more evidence\n- Making the opening more compelling\n- Adding specific company examples\n- Ensuring smooth transitions between ideas\n\n{guide}",
            strategy.prefix
        ),
        _ => format!(
            "{}: {topic}\n\nFinal polish:\n- Perfect the opening hook\n- Ensure every paragraph flows smoothly\n- Verify all data points are specific and impactful\n- Strengthen the conclusion\n\n{guide}",
            strategy.prefix
        ),
    }
}
