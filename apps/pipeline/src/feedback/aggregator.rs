//! Feedback Aggregator — turns one round's comparison batch into ranked
//! deficiencies, selected optimization directives, and a confidence score.
//!
//! The per-round dimension-mean history lives in `RunState`, owned by the
//! orchestrator and borrowed here for the duration of one round.

use tracing::{debug, info};

use crate::feedback::directives::{SelectedDirective, CATALOG};
use crate::models::candidate::Candidate;
use crate::models::comparison::{ComparisonResult, Dimension, DimensionMeans};
use crate::models::run::RunState;

const URGENCY_LOW: f64 = 0.6;
const URGENCY_MID: f64 = 0.7;
const STAGNATION_THRESHOLD: f64 = 0.7;
const STAGNATION_WINDOW: usize = 3;
const DEFICIENCY_CANDIDATES: usize = 5;
const MAX_DIRECTIVES: usize = 3;
const TREND_PENALTY: f64 = 0.2;

/// One round's aggregated feedback.
#[derive(Debug, Clone)]
pub struct FeedbackSummary {
    pub round: u32,
    pub means: DimensionMeans,
    /// Round-over-round delta of the mean overall similarity.
    pub overall_improvement: f64,
    pub best_strategy: String,
    pub worst_areas: Vec<Dimension>,
    pub directives: Vec<SelectedDirective>,
    pub confidence: f64,
}

/// Base importance of each dimension in deficiency weighting.
fn base_importance(dim: Dimension) -> f64 {
    match dim {
        Dimension::OverallSimilarity => 1.0,
        Dimension::StyleSimilarity => 0.9,
        Dimension::VoiceAuthenticity => 0.9,
        Dimension::ContentDepth => 0.85,
        Dimension::StructuralMatch => 0.8,
        Dimension::DataUsageMatch => 0.75,
        Dimension::HookEffectiveness => 0.7,
        Dimension::ConclusionStrength => 0.65,
    }
}

/// Summarizes a round's results: ranks deficiencies, selects directives,
/// and appends this round's dimension means to the run history.
pub fn summarize(
    results: &[ComparisonResult],
    candidates: &[Candidate],
    round: u32,
    state: &mut RunState,
) -> FeedbackSummary {
    let means = DimensionMeans::from_results(results);

    // Worst-first improvement priority list.
    let mut ranked: Vec<(Dimension, f64)> = Dimension::ALL
        .iter()
        .map(|&d| (d, means.get(d)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (dim, score) in &ranked {
        debug!("{dim}: {:.1}%", score * 100.0);
    }

    let weighted = weight_deficiencies(&ranked, &state.history);
    let directives = select_directives(&weighted, &means);

    let overall_improvement = state
        .history
        .last()
        .map(|prev| means.overall_similarity - prev.overall_similarity)
        .unwrap_or(0.0);

    // The only cross-round mutation the aggregator performs.
    state.history.push(means.clone());

    let confidence = confidence_score(results, round, &state.history);

    let best_strategy = results
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.overall_similarity.total_cmp(&b.1.overall_similarity))
        .and_then(|(idx, _)| candidates.get(idx))
        .map(|c| c.strategy.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let worst_areas: Vec<Dimension> = ranked
        .iter()
        .filter(|(_, score)| *score < STAGNATION_THRESHOLD)
        .take(3)
        .map(|(dim, _)| *dim)
        .collect();

    info!(
        "Round {round} feedback: improvement {:+.1}%, best strategy {best_strategy}, \
         {} directives, confidence {:.1}%",
        overall_improvement * 100.0,
        directives.len(),
        confidence * 100.0
    );

    FeedbackSummary {
        round,
        means,
        overall_improvement,
        best_strategy,
        worst_areas,
        directives,
        confidence,
    }
}

/// Weights each dimension by base importance, urgency, stagnation history,
/// and remaining headroom. Highest weight first.
fn weight_deficiencies(
    ranked: &[(Dimension, f64)],
    history: &[DimensionMeans],
) -> Vec<(Dimension, f64)> {
    let mut weighted: Vec<(Dimension, f64)> = ranked
        .iter()
        .map(|&(dim, score)| {
            let urgency = if score < URGENCY_LOW {
                1.5
            } else if score < URGENCY_MID {
                1.2
            } else {
                1.0
            };

            let stagnation = if history.len() >= STAGNATION_WINDOW
                && history
                    .iter()
                    .rev()
                    .take(STAGNATION_WINDOW)
                    .all(|h| h.get(dim) < STAGNATION_THRESHOLD)
            {
                1.3
            } else {
                1.0
            };

            let weight = base_importance(dim) * urgency * stagnation * (1.0 - score);
            (dim, weight)
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted
}

/// Matches the top weighted deficiencies against the directive catalog,
/// filters by applicability condition, and keeps the top 3 by adjusted
/// priority. Never returns more than `MAX_DIRECTIVES` entries.
fn select_directives(
    weighted: &[(Dimension, f64)],
    means: &DimensionMeans,
) -> Vec<SelectedDirective> {
    let max_weight = weighted
        .first()
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
        .max(f64::EPSILON);

    let mut selected = Vec::new();
    for &(dim, weight) in weighted.iter().take(DEFICIENCY_CANDIDATES) {
        for directive in CATALOG.iter().filter(|d| d.target == dim) {
            let applicable = directive
                .conditions
                .iter()
                .all(|c| means.get(c.dimension) < c.below);
            if applicable {
                selected.push(SelectedDirective {
                    directive,
                    adjusted_priority: directive.base_priority * weight / max_weight,
                });
            }
        }
    }

    selected.sort_by(|a, b| b.adjusted_priority.total_cmp(&a.adjusted_priority));
    selected.truncate(MAX_DIRECTIVES);
    selected
}

/// Confidence in the round's recommendations: batch consistency blended
/// with run maturity, penalized on a strictly declining 3-round trend.
fn confidence_score(results: &[ComparisonResult], round: u32, history: &[DimensionMeans]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let overall: Vec<f64> = results.iter().map(|r| r.overall_similarity).collect();
    let consistency = 1.0 - sample_stdev(&overall);
    let maturity = (round as f64 / 10.0).min(1.0);

    let declining = history.len() >= 3 && {
        let tail = &history[history.len() - 3..];
        tail[0].overall_similarity > tail[1].overall_similarity
            && tail[1].overall_similarity > tail[2].overall_similarity
    };
    let penalty = if declining { TREND_PENALTY } else { 0.0 };

    (0.6 * consistency + 0.4 * maturity - penalty).clamp(0.0, 1.0)
}

fn sample_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Builds the next round's generation prompt: the base style guide plus the
/// selected directive blocks and an iteration focus section.
pub fn build_next_prompt(base: &str, summary: &FeedbackSummary) -> String {
    let mut prompt = base.to_string();

    for selected in &summary.directives {
        let heading = selected.directive.name.to_uppercase().replace('_', " ");
        prompt.push_str(&format!("\n\n# {heading}\n{}", selected.directive.instruction));
    }

    let focus_list = summary
        .worst_areas
        .iter()
        .map(|d| format!("- {}", title_case(d.as_str())))
        .collect::<Vec<_>>()
        .join("\n");

    prompt.push_str(&format!(
        "\n\n# ROUND {} FOCUS AREAS\nPRIORITY IMPROVEMENTS:\n{focus_list}\n\n\
         CONFIDENCE LEVEL: {:.0}%\n\
         PERFORMANCE TREND: overall improvement this round {:+.1}%",
        summary.round + 1,
        summary.confidence * 100.0,
        summary.overall_improvement * 100.0
    ));

    prompt
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
