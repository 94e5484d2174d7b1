//! Crate-level error type
//!
//! Every failure is fatal for a batch run: input errors, configuration
//! errors and structural violations all surface here before or instead of
//! a result.

use std::io;
use thiserror::Error;
use tricount_graph_algorithms::{BuildError, ScheduleError};

#[derive(Error, Debug)]
pub enum TriCountError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed line in an input file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Matrix Market encoding this crate cannot count triangles on
    #[error("Unsupported Matrix Market type: {0}")]
    UnsupportedFormat(String),

    /// Declared sizes disagree with what was read
    #[error("Header mismatch: {0}")]
    HeaderMismatch(String),

    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Adjacency construction failed
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Strategy refused to run or a worker failed
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration file error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two strategies produced different totals for the same graph
    #[error("Strategies disagree: {0}")]
    Disagreement(String),
}

pub type TriCountResult<T> = Result<T, TriCountError>;
