//! Candidate Generator — fans out (backend, strategy) generation units
//! concurrently and collects whatever survives.
//!
//! Each unit runs under a bounded worker pool and an individual timeout.
//! A unit that errors or times out is dropped from the result set — retries
//! live inside the backends, not here. Zero surviving units is a valid
//! outcome ("no progress this round"), never an error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::generation::backend::{GenerationParams, TextBackend};
use crate::generation::prompts::build_generation_prompt;
use crate::generation::strategies::strategies_for_round;
use crate::models::candidate::{Candidate, GenerationUsage};

const MAX_TOKENS: u32 = 1500;
const EXPLORATION_TEMPERATURE: f32 = 0.7;
const REFINEMENT_TEMPERATURE: f32 = 0.5;

pub struct VariantGenerator {
    backends: Vec<Arc<dyn TextBackend>>,
    pool_width: usize,
    unit_timeout: Duration,
}

impl VariantGenerator {
    pub fn new(
        backends: Vec<Arc<dyn TextBackend>>,
        pool_width: usize,
        unit_timeout: Duration,
    ) -> Self {
        Self {
            backends,
            pool_width,
            unit_timeout,
        }
    }

    /// Generates one round's candidate variants.
    ///
    /// Dispatches every (backend, strategy) pair for the round as an
    /// independent unit of work and blocks until all units complete or
    /// time out. Results arrive unordered; each candidate carries its
    /// strategy label so downstream scoring is order-independent.
    pub async fn generate_variants(&self, topic: &str, round: u32, guide: &str) -> Vec<Candidate> {
        let strategies = strategies_for_round(round);
        let params = GenerationParams {
            temperature: if round <= 1 {
                EXPLORATION_TEMPERATURE
            } else {
                REFINEMENT_TEMPERATURE
            },
            max_tokens: MAX_TOKENS,
        };

        let semaphore = Arc::new(Semaphore::new(self.pool_width.max(1)));
        let mut units: JoinSet<Option<Candidate>> = JoinSet::new();

        for backend in &self.backends {
            for strategy in strategies {
                let backend = Arc::clone(backend);
                let semaphore = Arc::clone(&semaphore);
                let label = format!("{}-{}", backend.name(), strategy.name);
                let prompt = build_generation_prompt(topic, strategy, round, guide);
                let unit_timeout = self.unit_timeout;

                units.spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return None;
                    };
                    match timeout(unit_timeout, backend.generate(&prompt, params)).await {
                        Ok(Ok(output)) => {
                            debug!(
                                "{label}: {} tokens, ${:.4}, {:.1}s",
                                output.tokens, output.cost, output.latency_seconds
                            );
                            Some(Candidate::new(
                                label,
                                round,
                                output.text,
                                GenerationUsage {
                                    cost: output.cost,
                                    tokens: output.tokens,
                                    latency_seconds: output.latency_seconds,
                                },
                            ))
                        }
                        Ok(Err(e)) => {
                            warn!("{label}: generation failed: {e}");
                            None
                        }
                        Err(_) => {
                            warn!("{label}: generation timed out");
                            None
                        }
                    }
                });
            }
        }

        let dispatched = self.backends.len() * strategies.len();
        let mut candidates = Vec::new();
        while let Some(joined) = units.join_next().await {
            if let Ok(Some(candidate)) = joined {
                candidates.push(candidate);
            }
        }

        info!(
            "Round {round}: {}/{} generation units produced a candidate",
            candidates.len(),
            dispatched
        );
        candidates
    }
}
