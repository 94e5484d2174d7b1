//! Tricount
//!
//! Triangle counting on undirected graphs stored as sparse adjacency.
//!
//! # Architecture
//!
//! Data flows strictly forward:
//!
//! 1. Edge ingestion ([`io`]) reads Matrix Market or plain edge lists into a
//!    coordinate [`EdgeList`].
//! 2. The COO→CSC builder produces a read-only [`CscGraph`] with sorted
//!    adjacency slices.
//! 3. The merge-join kernel counts triangles under one of three execution
//!    strategies: sequential, dynamic rayon chunks, or static thread ranges.
//! 4. [`TriangleEngine`] wraps the pipeline and emits a serializable
//!    [`RunReport`].
//!
//! The algorithms themselves live in the `tricount-graph-algorithms` crate;
//! this crate provides the integration layer.
//!
//! ## Example Usage
//!
//! ```rust
//! use tricount::{RunConfig, StrategyKind, TriangleEngine};
//! use tricount::algo::generators;
//!
//! let engine = TriangleEngine::new(RunConfig {
//!     strategy: StrategyKind::Static,
//!     threads: Some(2),
//!     ..RunConfig::default()
//! });
//!
//! // Complete graph K4 has C(4, 3) = 4 triangles
//! let loaded = engine.build(generators::complete(4), "k4", 0.0).unwrap();
//! let report = engine.count(&loaded).unwrap();
//! assert_eq!(report.triangles, 4);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod report;

/// Re-export of the algorithms crate
pub use tricount_graph_algorithms as algo;

pub use config::{InputFormat, RunConfig, StrategyKind, DEFAULT_CHUNK_SIZE};
pub use engine::{LoadedGraph, TriangleEngine};
pub use error::{TriCountError, TriCountResult};
pub use io::{EdgeListReader, EdgeSource, MatrixMarketReader};
pub use report::{GraphSummary, PartitionSummary, RunReport};

pub use tricount_graph_algorithms::{
    coo_to_csc, count_triangles, CountMode, CscGraph, EdgeList, EdgePolicy, IndexBase, Schedule,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
