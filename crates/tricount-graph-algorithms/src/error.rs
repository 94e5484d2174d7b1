//! Error types for construction and scheduling

use crate::common::VertexId;
use std::fmt;
use thiserror::Error;

/// Which endpoint of a coordinate entry an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// COO→CSC construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Index base flag other than 0 or 1
    #[error("Invalid index base {0}: expected 0 or 1")]
    InvalidIndexBase(u32),

    /// Graph without vertices
    #[error("Vertex count must be positive")]
    EmptyVertexSet,

    /// Row and column arrays differ in length
    #[error("Coordinate length mismatch: {rows} row indices, {cols} column indices")]
    LengthMismatch { rows: usize, cols: usize },

    /// Endpoint outside [base, N - 1 + base]
    #[error("Edge {position}: {axis} index {value} outside [{min}, {max}]")]
    OutOfRange {
        position: usize,
        axis: Axis,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Self-loop rejected by policy
    #[error("Self-loop on vertex {0}")]
    SelfLoop(VertexId),

    /// Repeated edge rejected by policy
    #[error("Duplicate edge ({row}, {col})")]
    DuplicateEdge { row: VertexId, col: VertexId },

    /// Hand-assembled CSC parts violate the structure invariants
    #[error("Malformed CSC structure: {0}")]
    MalformedCsc(String),
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Execution strategy errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Thread count of zero or larger than the vertex count
    #[error("Invalid thread count {threads}: must be between 1 and {vertex_count}")]
    InvalidThreadCount { threads: usize, vertex_count: usize },

    /// Dynamic chunk size of zero
    #[error("Chunk size must be positive")]
    InvalidChunkSize,

    /// Rayon pool construction failed
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// OS refused to start a worker thread
    #[error("Failed to spawn worker {thread}: {source}")]
    Spawn {
        thread: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked before reporting its result
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
