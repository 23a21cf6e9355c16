#![allow(dead_code)]

use thiserror::Error;

/// Pipeline-level error type.
///
/// Per-unit generation and scoring failures never surface here — they are
/// absorbed at the unit-of-work boundary. These variants cover the fatal
/// cases (unusable corpus at startup) and infrastructure failures
/// (artifact writing).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty corpus: no usable reference documents")]
    EmptyCorpus,

    #[error("generation backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
