use crate::configuration::size::SizeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed test event on line {line}: {source}")]
    Decode {
        line: usize,
        source: serde_json::Error,
    },
    #[error("malformed package descriptor #{index} in {path}: {source}")]
    Manifest {
        path: PathBuf,
        index: usize,
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Size(#[from] SizeError),
    #[error("package lookup for '{package}' failed: {reason}")]
    Lookup { package: String, reason: String },
    #[error("package lookup task failed: {0}")]
    LookupTask(#[from] tokio::task::JoinError),
    #[error("cannot parse test source {path}: {reason}")]
    Unparseable { path: PathBuf, reason: String },
    #[error("failed to render report: {0}")]
    Render(#[from] liquid::Error),
    #[error("failed to serialize report data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
