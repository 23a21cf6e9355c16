use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// At least one generation backend key must be present.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub topic: String,
    pub output_dir: PathBuf,
    pub max_rounds: u32,
    pub convergence_threshold: f64,
    pub max_stagnation: u32,
    pub corpus_size: usize,
    pub pool_width: usize,
    pub unit_timeout_secs: u64,
    pub use_llm_judge: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        let openai_api_key = optional_env("OPENAI_API_KEY");
        if anthropic_api_key.is_none() && openai_api_key.is_none() {
            bail!("No generation backend configured: set ANTHROPIC_API_KEY or OPENAI_API_KEY");
        }

        Ok(Config {
            anthropic_api_key,
            openai_api_key,
            topic: std::env::var("TOPIC")
                .unwrap_or_else(|_| "How AI agents are transforming B2B sales efficiency".to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "iterative_improvements".to_string())
                .into(),
            max_rounds: parse_env("MAX_ROUNDS", 10)?,
            convergence_threshold: parse_env("CONVERGENCE_THRESHOLD", 0.02)?,
            max_stagnation: parse_env("MAX_STAGNATION", 3)?,
            corpus_size: parse_env("CORPUS_SIZE", 20)?,
            pool_width: parse_env("GENERATION_POOL_WIDTH", 6)?,
            unit_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 60)?,
            use_llm_judge: std::env::var("USE_LLM_JUDGE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
