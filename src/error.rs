use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by pipeline stages and translation providers.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input directory {0:?} does not exist")]
    MissingInput(PathBuf),
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path:?} has no '{key}' key")]
    MissingKey { path: PathBuf, key: &'static str },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned no usable translation: {details}")]
    Provider {
        provider: &'static str,
        details: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
