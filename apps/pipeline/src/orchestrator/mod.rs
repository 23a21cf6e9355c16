//! Iteration Orchestrator — drives repeated rounds of generate → score →
//! feedback until convergence, stagnation, or the round cap.
//!
//! Flow per round: generate candidates with the current prompt → score each
//! against a round-robin paired reference → aggregate feedback → check the
//! convergence condition → rebuild the prompt from the top directives.
//! All cross-round state lives in an explicit `RunState` owned here.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyze_corpus;
use crate::corpus::CorpusSource;
use crate::errors::PipelineError;
use crate::feedback::aggregator::{build_next_prompt, summarize};
use crate::generation::generator::VariantGenerator;
use crate::generation::prompts::style_guide;
use crate::models::comparison::ComparisonResult;
use crate::models::run::{IterationRecord, RunState, RunSummary, TerminalState};
use crate::persist::RunWriter;
use crate::scoring::ComparativeScorer;

/// A round's best score above this ends the run as converged.
const EXCELLENCE_THRESHOLD: f64 = 0.95;

/// Run-level knobs. Thresholds are empirical constants preserved from the
/// reference corpus work, not tuned values.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub max_rounds: u32,
    pub convergence_threshold: f64,
    pub max_stagnation: u32,
    pub corpus_size: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            convergence_threshold: 0.02,
            max_stagnation: 3,
            corpus_size: 20,
        }
    }
}

/// Outcome of the post-feedback convergence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundDecision {
    Continue,
    Converged,
    Stagnated,
    MaxRounds,
}

/// Tracks round-over-round improvement and the stagnation counter.
#[derive(Debug)]
pub struct ConvergenceTracker {
    convergence_threshold: f64,
    max_stagnation: u32,
    stagnation_count: u32,
    previous_best: Option<f64>,
}

impl ConvergenceTracker {
    pub fn new(convergence_threshold: f64, max_stagnation: u32) -> Self {
        Self {
            convergence_threshold,
            max_stagnation,
            stagnation_count: 0,
            previous_best: None,
        }
    }

    pub fn stagnation_count(&self) -> u32 {
        self.stagnation_count
    }

    /// Feeds one round's best score and decides how the run proceeds.
    pub fn observe(&mut self, round_best: f64, round: u32, max_rounds: u32) -> RoundDecision {
        if let Some(previous) = self.previous_best {
            let delta = round_best - previous;
            if delta < self.convergence_threshold {
                self.stagnation_count += 1;
                info!(
                    "Low improvement {delta:+.3} (stagnation {}/{})",
                    self.stagnation_count, self.max_stagnation
                );
            } else {
                self.stagnation_count = 0;
                info!("Good improvement {delta:+.3}");
            }
        }
        self.previous_best = Some(round_best);

        if self.stagnation_count >= self.max_stagnation {
            RoundDecision::Stagnated
        } else if round_best > EXCELLENCE_THRESHOLD {
            RoundDecision::Converged
        } else if round >= max_rounds {
            RoundDecision::MaxRounds
        } else {
            RoundDecision::Continue
        }
    }

    /// A round that produced no candidates counts against stagnation but
    /// does not move the improvement baseline.
    pub fn observe_no_progress(&mut self, round: u32, max_rounds: u32) -> RoundDecision {
        self.stagnation_count += 1;
        warn!(
            "No candidates this round (stagnation {}/{})",
            self.stagnation_count, self.max_stagnation
        );
        if self.stagnation_count >= self.max_stagnation {
            RoundDecision::Stagnated
        } else if round >= max_rounds {
            RoundDecision::MaxRounds
        } else {
            RoundDecision::Continue
        }
    }
}

/// Round-robin candidate/reference pairing.
pub fn paired_reference_index(candidate_index: usize, reference_count: usize) -> usize {
    candidate_index % reference_count.max(1)
}

pub struct IterationOrchestrator {
    corpus: Box<dyn CorpusSource>,
    generator: VariantGenerator,
    scorer: ComparativeScorer,
    writer: RunWriter,
    settings: RunSettings,
}

impl IterationOrchestrator {
    pub fn new(
        corpus: Box<dyn CorpusSource>,
        generator: VariantGenerator,
        scorer: ComparativeScorer,
        writer: RunWriter,
        settings: RunSettings,
    ) -> Self {
        Self {
            corpus,
            generator,
            scorer,
            writer,
            settings,
        }
    }

    /// Runs the full improvement loop for one topic. Once the corpus
    /// analysis succeeds, a summary is always produced — underperforming
    /// rounds end in a terminal state, not an error.
    pub async fn run(&self, topic: &str) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let run_key = run_id.to_string();
        info!("Starting improvement run {run_id} for topic: {topic}");

        // INIT: analyze the corpus once; the only fatal phase.
        let entries = self.corpus.fetch(self.settings.corpus_size)?;
        let analysis = analyze_corpus(&entries, self.settings.corpus_size)?;
        self.writer.write_style_analysis(&run_key, &analysis)?;

        let references = &analysis.documents;
        let base_guide = style_guide(&analysis.profile);
        let mut current_prompt = base_guide.clone();

        let mut state = RunState::new();
        let mut tracker = ConvergenceTracker::new(
            self.settings.convergence_threshold,
            self.settings.max_stagnation,
        );

        let mut terminal = TerminalState::MaxRounds;

        for round in 1..=self.settings.max_rounds {
            info!("Round {round}/{} starting", self.settings.max_rounds);

            // GENERATING
            let candidates = self
                .generator
                .generate_variants(topic, round, &current_prompt)
                .await;

            if candidates.is_empty() {
                let decision = tracker.observe_no_progress(round, self.settings.max_rounds);
                state.stagnation_count = tracker.stagnation_count();
                let record = IterationRecord {
                    round,
                    timestamp: Utc::now(),
                    candidates: vec![],
                    results: vec![],
                    round_best_score: 0.0,
                    best_overall_score: state.best_score,
                    selected_directives: vec![],
                };
                self.writer.write_round(&run_key, &record)?;
                state.records.push(record);

                match decision {
                    RoundDecision::Continue => continue,
                    RoundDecision::Stagnated => {
                        terminal = TerminalState::Stagnated;
                        break;
                    }
                    _ => {
                        terminal = TerminalState::MaxRounds;
                        break;
                    }
                }
            }

            // SCORING: round-robin pairing keeps every reference in play.
            let mut results: Vec<ComparisonResult> = Vec::with_capacity(candidates.len());
            for (i, candidate) in candidates.iter().enumerate() {
                let reference = &references[paired_reference_index(i, references.len())];
                results.push(self.scorer.score(&candidate.text, reference).await);
            }

            // FEEDBACK
            let feedback = summarize(&results, &candidates, round, &mut state);

            let (best_idx, round_best) = results
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.overall_similarity.total_cmp(&b.1.overall_similarity))
                .map(|(i, r)| (i, r.overall_similarity))
                .unwrap_or((0, 0.0));

            state.observe_best(round_best, candidates.get(best_idx), &current_prompt);

            let decision = tracker.observe(round_best, round, self.settings.max_rounds);
            state.stagnation_count = tracker.stagnation_count();

            let record = IterationRecord {
                round,
                timestamp: Utc::now(),
                candidates: candidates.clone(),
                results,
                round_best_score: round_best,
                best_overall_score: state.best_score,
                selected_directives: feedback
                    .directives
                    .iter()
                    .map(|s| s.directive.name.to_string())
                    .collect(),
            };
            self.writer.write_round(&run_key, &record)?;
            state.records.push(record);

            info!(
                "Round {round} complete: best {:.1}%, running best {:.1}%",
                round_best * 100.0,
                state.best_score * 100.0
            );

            match decision {
                RoundDecision::Continue => {
                    current_prompt = build_next_prompt(&base_guide, &feedback);
                }
                RoundDecision::Converged => {
                    terminal = TerminalState::Converged;
                    break;
                }
                RoundDecision::Stagnated => {
                    terminal = TerminalState::Stagnated;
                    break;
                }
                RoundDecision::MaxRounds => {
                    terminal = TerminalState::MaxRounds;
                    break;
                }
            }
        }

        let summary = build_summary(run_id, &state, terminal);
        self.writer.write_summary(&run_key, &summary, &state.records)?;

        info!(
            "Run {run_id} finished: {:?} after {} rounds, best {:.1}%",
            terminal,
            summary.rounds_completed,
            summary.best_score * 100.0
        );

        Ok(summary)
    }
}

fn build_summary(run_id: Uuid, state: &RunState, terminal: TerminalState) -> RunSummary {
    let trajectory: Vec<f64> = state.records.iter().map(|r| r.round_best_score).collect();
    let first_score = trajectory.first().copied().unwrap_or(0.0);
    let final_score = trajectory.last().copied().unwrap_or(0.0);

    let deltas: Vec<f64> = trajectory.windows(2).map(|w| w[1] - w[0]).collect();
    let avg_improvement_per_round = if deltas.is_empty() {
        0.0
    } else {
        deltas.iter().sum::<f64>() / deltas.len() as f64
    };

    let best_round = state
        .records
        .iter()
        .max_by(|a, b| a.round_best_score.total_cmp(&b.round_best_score))
        .map(|r| r.round)
        .unwrap_or(0);

    let mut area_counts: std::collections::BTreeMap<&str, usize> = Default::default();
    for record in &state.records {
        for result in &record.results {
            for area in &result.improvement_areas {
                *area_counts.entry(area.as_str()).or_insert(0) += 1;
            }
        }
    }
    let mut ranked_areas: Vec<(&str, usize)> = area_counts.into_iter().collect();
    ranked_areas.sort_by(|a, b| b.1.cmp(&a.1));
    let most_common_improvement_areas = ranked_areas
        .into_iter()
        .take(5)
        .map(|(area, _)| area.to_string())
        .collect();

    RunSummary {
        run_id: run_id.to_string(),
        rounds_completed: state.records.len() as u32,
        first_score,
        final_score,
        best_score: state.best_score,
        best_round,
        total_improvement: final_score - first_score,
        avg_improvement_per_round,
        most_common_improvement_areas,
        score_trajectory: trajectory,
        terminal_state: terminal,
        convergence_achieved: matches!(
            terminal,
            TerminalState::Converged | TerminalState::Stagnated
        ),
        final_prompt: state.best_prompt.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::corpus::SampleCorpus;
    use crate::generation::backend::{GenerationOutput, GenerationParams, TextBackend};
    use crate::llm_client::LlmError;

    #[test]
    fn test_round_robin_pairing() {
        // 2 candidates over 5 references map to references 0 and 1.
        assert_eq!(paired_reference_index(0, 5), 0);
        assert_eq!(paired_reference_index(1, 5), 1);
        // Wrap-around past the reference count.
        assert_eq!(paired_reference_index(5, 5), 0);
        assert_eq!(paired_reference_index(7, 5), 2);
    }

    #[test]
    fn test_pairing_survives_empty_reference_set() {
        assert_eq!(paired_reference_index(3, 0), 0);
    }

    #[test]
    fn test_small_improvements_stagnate_after_three_rounds() {
        // Six rounds each improving by 0.01 — under the 0.02 threshold —
        // must end in stagnation at the fourth round, not run all six.
        let mut tracker = ConvergenceTracker::new(0.02, 3);
        let bests = [0.50, 0.51, 0.52, 0.53, 0.54, 0.55];
        let mut decisions = Vec::new();
        for (i, best) in bests.iter().enumerate() {
            let decision = tracker.observe(*best, i as u32 + 1, 20);
            decisions.push(decision);
            if decision != RoundDecision::Continue {
                break;
            }
        }
        assert_eq!(decisions.len(), 4);
        assert_eq!(*decisions.last().unwrap(), RoundDecision::Stagnated);
    }

    #[test]
    fn test_good_improvement_resets_stagnation() {
        let mut tracker = ConvergenceTracker::new(0.02, 3);
        tracker.observe(0.50, 1, 20);
        tracker.observe(0.51, 2, 20);
        tracker.observe(0.52, 3, 20);
        assert_eq!(tracker.stagnation_count(), 2);
        tracker.observe(0.60, 4, 20);
        assert_eq!(tracker.stagnation_count(), 0);
    }

    #[test]
    fn test_excellent_score_converges() {
        let mut tracker = ConvergenceTracker::new(0.02, 3);
        tracker.observe(0.50, 1, 20);
        assert_eq!(tracker.observe(0.96, 2, 20), RoundDecision::Converged);
    }

    #[test]
    fn test_round_cap_reached() {
        let mut tracker = ConvergenceTracker::new(0.02, 3);
        tracker.observe(0.10, 1, 3);
        tracker.observe(0.20, 2, 3);
        assert_eq!(tracker.observe(0.30, 3, 3), RoundDecision::MaxRounds);
    }

    #[test]
    fn test_no_progress_rounds_count_toward_stagnation() {
        let mut tracker = ConvergenceTracker::new(0.02, 3);
        assert_eq!(tracker.observe_no_progress(1, 20), RoundDecision::Continue);
        assert_eq!(tracker.observe_no_progress(2, 20), RoundDecision::Continue);
        assert_eq!(tracker.observe_no_progress(3, 20), RoundDecision::Stagnated);
    }

    struct FixedBackend;

    #[async_trait]
    impl TextBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _params: GenerationParams,
        ) -> Result<GenerationOutput, LlmError> {
            Ok(GenerationOutput {
                text: "The landscape is shifting.\n\n\
Is this the moment everything changes?\n\n\
Early adopters report 66% cost reductions and the data demonstrates a clear advantage. \
This strategy will reward the companies that apply it."
                    .to_string(),
                cost: 0.01,
                tokens: 80,
                latency_seconds: 0.1,
            })
        }
    }

    struct DeadBackend;

    #[async_trait]
    impl TextBackend for DeadBackend {
        fn name(&self) -> &str {
            "dead"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _params: GenerationParams,
        ) -> Result<GenerationOutput, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    fn orchestrator_with(backend: Arc<dyn TextBackend>, dir: &std::path::Path) -> IterationOrchestrator {
        let generator = VariantGenerator::new(vec![backend], 6, Duration::from_secs(60));
        let scorer = ComparativeScorer::new(None, None);
        let writer = RunWriter::create(dir).unwrap();
        IterationOrchestrator::new(
            Box::new(SampleCorpus),
            generator,
            scorer,
            writer,
            RunSettings {
                max_rounds: 6,
                corpus_size: 5,
                ..RunSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_best_score_never_decreases_across_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with(Arc::new(FixedBackend), dir.path());
        let summary = orchestrator.run("AI agents in sales").await.unwrap();

        assert!(summary.rounds_completed >= 2);
        // Reconstruct the running-best sequence from the persisted records.
        let complete: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(format!("run_{}", summary.run_id)).join("complete_results.json")).unwrap(),
        )
        .unwrap();
        let rounds = complete["rounds"].as_array().unwrap();
        let bests: Vec<f64> = rounds
            .iter()
            .map(|r| r["best_overall_score"].as_f64().unwrap())
            .collect();
        for pair in bests.windows(2) {
            assert!(pair[0] <= pair[1], "best pointer decreased: {bests:?}");
        }
    }

    #[tokio::test]
    async fn test_identical_rounds_end_in_stagnation() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with(Arc::new(FixedBackend), dir.path());
        let summary = orchestrator.run("AI agents in sales").await.unwrap();
        assert_eq!(summary.terminal_state, TerminalState::Stagnated);
        assert!(summary.convergence_achieved);
    }

    #[tokio::test]
    async fn test_all_backends_failing_still_produces_summary() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with(Arc::new(DeadBackend), dir.path());
        let summary = orchestrator.run("AI agents in sales").await.unwrap();
        // Three empty rounds in a row exhaust the stagnation allowance.
        assert_eq!(summary.terminal_state, TerminalState::Stagnated);
        assert_eq!(summary.rounds_completed, 3);
        assert_eq!(summary.best_score, 0.0);
    }

    #[tokio::test]
    async fn test_summary_reports_trajectory_and_best_round() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with(Arc::new(FixedBackend), dir.path());
        let summary = orchestrator.run("AI agents in sales").await.unwrap();
        assert_eq!(summary.score_trajectory.len() as u32, summary.rounds_completed);
        assert!(summary.best_round >= 1);
        assert!((summary.final_score - summary.first_score - summary.total_improvement).abs() < 1e-9);
    }
}
