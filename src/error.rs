use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {file}: {source}")]
    Parse {
        file: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("dataset {dataset} is missing required column {column}")]
    SchemaMismatch { dataset: String, column: String },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("engine error: {0}")]
    Engine(#[from] PolarsError),
}
