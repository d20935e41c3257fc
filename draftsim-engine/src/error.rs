use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the generation engine.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("frequency table for {attribute} has no observations")]
    InvalidDistribution { attribute: String },
    #[error("aggregated stats contain no usable {what}")]
    EmptyAggregation { what: &'static str },
    #[error("no attribute profile for position {0}")]
    UnknownPosition(String),
    #[error("malformed athlete corpus: {0}")]
    Corpus(String),
    #[error("franchise pool exhausted: need {needed} teams, only {available} available")]
    FranchisePoolExhausted { needed: usize, available: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub(crate) fn invalid_distribution(attribute: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            attribute: attribute.into(),
        }
    }
}
