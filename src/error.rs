//! Errors raised while building a [`TowerManager`](crate::manager::TowerManager) or answering a query.

use thiserror::Error;

use crate::model::{OperatorCode, RowId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected input or setup, reported before any search runs
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The search window hit its radius cap without seeing enough operators
    #[error("search window reached radius {max_radius} with only {found} of {required} operators")]
    UnboundedExpansion {
        required: usize,
        found: usize,
        max_radius: f64,
    },

    /// A nearest-tower result does not point back at a matching dataset row
    #[error("nearest tower for operator {operator} points at row {row} which does not match the dataset")]
    InternalConsistency { operator: OperatorCode, row: RowId },

    #[error("line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("record {row}: {reason}")]
    MalformedRecord { row: RowId, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid location ({latitude}, {longitude}): {reason}")]
    InvalidLocation {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("networks are not dataset columns: {}", .0.join(", "))]
    UnknownNetworks(Vec<String>),

    #[error("invalid operator table: {0}")]
    InvalidOperators(String),

    #[error("invalid search radius: {0}")]
    InvalidRadius(String),
}
