//! Run configuration
//!
//! Loaded from YAML and/or assembled from command-line flags. Thread and
//! chunk checks happen in [`RunConfig::validate`], before any worker starts.

use crate::error::TriCountResult;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tricount_graph_algorithms::{CountMode, EdgePolicy, IndexBase, Schedule, ScheduleError};

/// Default number of outer vertices per dynamically scheduled chunk
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Which execution strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Sequential,
    #[default]
    Dynamic,
    Static,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Sequential,
        StrategyKind::Dynamic,
        StrategyKind::Static,
    ];
}

/// Input file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Decide from the file extension
    #[default]
    Auto,
    MatrixMarket,
    EdgeList,
}

impl InputFormat {
    /// Resolve `Auto` by extension: `.mtx`/`.mm` are Matrix Market, anything else an edge list
    pub fn resolve(self, path: &Path) -> InputFormat {
        match self {
            InputFormat::Auto => match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("mtx") || ext.eq_ignore_ascii_case("mm") => {
                    InputFormat::MatrixMarket
                }
                _ => InputFormat::EdgeList,
            },
            explicit => explicit,
        }
    }
}

/// Triangle counting run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Execution strategy
    pub strategy: StrategyKind,
    /// Worker threads; `None` picks the available parallelism, capped at N
    pub threads: Option<usize>,
    /// Minimum chunk of outer vertices per dynamic work item
    pub chunk_size: usize,
    /// Self-loop / duplicate / orientation handling
    pub edge_policy: EdgePolicy,
    /// Collect how many triangles each vertex belongs to
    pub per_vertex: bool,
    /// Edge count the caller expects the input to declare
    pub expected_edges: Option<usize>,
    /// Input encoding
    pub format: InputFormat,
    /// Index base of plain edge lists (Matrix Market is always 1-based)
    pub edge_list_base: IndexBase,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            threads: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            edge_policy: EdgePolicy::default(),
            per_vertex: false,
            expected_edges: None,
            format: InputFormat::default(),
            edge_list_base: IndexBase::Zero,
        }
    }
}

impl RunConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> TriCountResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> TriCountResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn count_mode(&self) -> CountMode {
        if self.per_vertex {
            CountMode::PerVertex
        } else {
            CountMode::Total
        }
    }

    /// Worker threads for a graph with `vertex_count` vertices
    pub fn effective_threads(&self, vertex_count: usize) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
                .min(vertex_count.max(1))
        })
    }

    /// Check thread count and chunk size against the graph size
    pub fn validate(&self, vertex_count: usize) -> TriCountResult<()> {
        if self.strategy == StrategyKind::Sequential {
            return Ok(());
        }
        let threads = self.effective_threads(vertex_count);
        if threads == 0 || threads > vertex_count {
            return Err(ScheduleError::InvalidThreadCount {
                threads,
                vertex_count,
            }
            .into());
        }
        if self.strategy == StrategyKind::Dynamic && self.chunk_size == 0 {
            return Err(ScheduleError::InvalidChunkSize.into());
        }
        Ok(())
    }

    /// Schedule for `kind`, using this configuration's threads and chunk size
    pub fn schedule_for(&self, kind: StrategyKind, vertex_count: usize) -> Schedule {
        let threads = self.effective_threads(vertex_count);
        match kind {
            StrategyKind::Sequential => Schedule::Sequential,
            StrategyKind::Dynamic => Schedule::Dynamic {
                threads,
                chunk_size: self.chunk_size,
            },
            StrategyKind::Static => Schedule::Static { threads },
        }
    }

    pub fn schedule(&self, vertex_count: usize) -> Schedule {
        self.schedule_for(self.strategy, vertex_count)
    }
}
