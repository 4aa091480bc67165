use std::net::SocketAddr;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode model artifact {path:?}: {source}")]
    ModelDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported model artifact version {found} (expected {expected})")]
    UnsupportedModelVersion { found: u32, expected: u32 },
    #[error("cannot encode model artifact: {0}")]
    ModelEncode(#[from] serde_json::Error),
    #[error("feature schema mismatch: {reason}")]
    SchemaMismatch { reason: String },
    #[error("unknown feature {name:?}")]
    UnknownFeature { name: String },
    #[error("invalid value {value:?} for feature {name:?}")]
    InvalidFeatureValue { name: String, value: String },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("{0}")]
    Chart(String),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("background task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
