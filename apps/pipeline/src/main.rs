mod analysis;
mod config;
mod corpus;
mod errors;
mod feedback;
mod generation;
mod llm_client;
mod models;
mod orchestrator;
mod persist;
mod scoring;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::SampleCorpus;
use crate::generation::backend::{AnthropicBackend, OpenAiBackend, TextBackend};
use crate::generation::generator::VariantGenerator;
use crate::llm_client::{LlmClient, DEFAULT_MODEL};
use crate::orchestrator::{IterationOrchestrator, RunSettings};
use crate::persist::RunWriter;
use crate::scoring::judge::{LlmPairwiseJudge, LlmRubricJudge, PairwiseJudge, RubricJudge};
use crate::scoring::ComparativeScorer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (errors on missing backend keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pipeline v{}", env!("CARGO_PKG_VERSION"));

    // Topic: first CLI argument wins over the TOPIC variable.
    let topic = std::env::args().nth(1).unwrap_or_else(|| config.topic.clone());

    // Generation backends, selected by configured keys.
    let mut backends: Vec<Arc<dyn TextBackend>> = Vec::new();
    if let Some(key) = &config.anthropic_api_key {
        backends.push(Arc::new(AnthropicBackend::new(LlmClient::new(
            key.clone(),
            DEFAULT_MODEL,
        ))));
        info!("Anthropic backend initialized (model: {DEFAULT_MODEL})");
    }
    if let Some(key) = &config.openai_api_key {
        backends.push(Arc::new(OpenAiBackend::new(key.clone())));
        info!("OpenAI backend initialized");
    }

    // Judges ride on the Anthropic client when available.
    let pairwise: Option<Arc<dyn PairwiseJudge>> = config.anthropic_api_key.as_ref().map(|key| {
        Arc::new(LlmPairwiseJudge::new(LlmClient::new(key.clone(), DEFAULT_MODEL)))
            as Arc<dyn PairwiseJudge>
    });
    let rubric: Option<Arc<dyn RubricJudge>> = if config.use_llm_judge {
        config.anthropic_api_key.as_ref().map(|key| {
            Arc::new(LlmRubricJudge::new(LlmClient::new(key.clone(), DEFAULT_MODEL)))
                as Arc<dyn RubricJudge>
        })
    } else {
        None
    };
    if rubric.is_some() {
        info!("Rubric judge enabled");
    }

    let generator = VariantGenerator::new(
        backends,
        config.pool_width,
        Duration::from_secs(config.unit_timeout_secs),
    );
    let scorer = ComparativeScorer::new(pairwise, rubric);
    let writer = RunWriter::create(&config.output_dir)?;

    let orchestrator = IterationOrchestrator::new(
        Box::new(SampleCorpus),
        generator,
        scorer,
        writer,
        RunSettings {
            max_rounds: config.max_rounds,
            convergence_threshold: config.convergence_threshold,
            max_stagnation: config.max_stagnation,
            corpus_size: config.corpus_size,
        },
    );

    let summary = orchestrator.run(&topic).await?;

    info!(
        "Run complete: {} rounds, best score {:.1}% (round {}), improvement {:+.1}%",
        summary.rounds_completed,
        summary.best_score * 100.0,
        summary.best_round,
        summary.total_improvement * 100.0
    );
    info!(
        "Convergence {} - results under {}",
        if summary.convergence_achieved {
            "achieved"
        } else {
            "not reached"
        },
        config.output_dir.display()
    );

    Ok(())
}
