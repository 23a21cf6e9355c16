//! Run-long state and records.
//!
//! `RunState` is the only cross-round mutable state in the system. It is
//! owned by the orchestrator and lent to the feedback aggregator for the
//! duration of one round — no module-level accumulation anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;
use crate::models::comparison::{ComparisonResult, DimensionMeans};

/// One round's snapshot. Append-only, ordered by round index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    pub candidates: Vec<Candidate>,
    pub results: Vec<ComparisonResult>,
    pub round_best_score: f64,
    /// Running best across the whole run — never decreases.
    pub best_overall_score: f64,
    pub selected_directives: Vec<String>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    Converged,
    Stagnated,
    MaxRounds,
}

/// Cross-round pipeline state, owned exclusively by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub records: Vec<IterationRecord>,
    /// Per-round dimension means, used for stagnation and trend detection.
    pub history: Vec<DimensionMeans>,
    pub best_score: f64,
    pub best_candidate: Option<Candidate>,
    pub best_prompt: String,
    pub stagnation_count: u32,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round-best score of the most recent completed round, if any.
    pub fn previous_round_best(&self) -> Option<f64> {
        self.records.last().map(|r| r.round_best_score)
    }

    /// Updates the best-overall pointer. Strict improvement only — a tie
    /// keeps the earlier candidate.
    pub fn observe_best(&mut self, score: f64, candidate: Option<&Candidate>, prompt: &str) {
        if score > self.best_score {
            self.best_score = score;
            self.best_candidate = candidate.cloned();
            self.best_prompt = prompt.to_string();
        }
    }
}

/// Final run report, produced for every terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub rounds_completed: u32,
    pub first_score: f64,
    pub final_score: f64,
    pub best_score: f64,
    pub best_round: u32,
    pub total_improvement: f64,
    pub avg_improvement_per_round: f64,
    pub most_common_improvement_areas: Vec<String>,
    pub score_trajectory: Vec<f64>,
    pub terminal_state: TerminalState,
    pub convergence_achieved: bool,
    pub final_prompt: String,
}
