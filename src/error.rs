//! Error types for loading dashboard data and building views

use crate::cluster::ClusterKey;
use crate::model::ModelError;
use crate::survey::ParseCategoryError;
use std::path::PathBuf;
use thiserror::Error;

/// Result of a load step
pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// Fatal failures while loading the model, survey data or cluster metadata
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read survey data from {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("invalid model artifact {}: {source}", .path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("invalid survey row at {}:{line}: {source}", .path.display())]
    Category {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseCategoryError,
    },
}

/// Per-request failure that stops rendering but keeps the process alive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("no description found for cluster: {key}")]
    MetadataNotFound { key: ClusterKey },
}
