//! Triangle counting engine
//!
//! Wires edge ingestion, the COO→CSC builder and an execution strategy
//! together. The adjacency is built once and shared read-only by every
//! strategy run against it.

use crate::config::{RunConfig, StrategyKind};
use crate::error::{TriCountError, TriCountResult};
use crate::io::{open_source, EdgeSource};
use crate::report::{GraphSummary, RunReport};
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tricount_graph_algorithms::{build_csc, BuildStats, CscGraph, EdgeList, ExecutionStrategy};

/// A graph ready for counting, with how long it took to get there
pub struct LoadedGraph {
    pub source: String,
    pub graph: CscGraph,
    pub stats: BuildStats,
    pub read_seconds: f64,
    pub build_seconds: f64,
}

impl LoadedGraph {
    pub fn summary(&self) -> GraphSummary {
        GraphSummary::new(&self.graph, &self.stats)
    }
}

/// Runs triangle counts according to a [`RunConfig`]
pub struct TriangleEngine {
    config: RunConfig,
}

impl TriangleEngine {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read and build the graph stored at `path`
    pub fn load(&self, path: &Path) -> TriCountResult<LoadedGraph> {
        let mut source = open_source(path, &self.config)?;
        self.load_from(source.as_mut(), &path.display().to_string())
    }

    /// Read and build from any edge source
    pub fn load_from(&self, source: &mut dyn EdgeSource, label: &str) -> TriCountResult<LoadedGraph> {
        let start = Instant::now();
        let edges = source.read_edges()?;
        let read_seconds = start.elapsed().as_secs_f64();
        self.build(edges, label, read_seconds)
    }

    /// Build from an edge list already in memory
    pub fn build(&self, edges: EdgeList, label: &str, read_seconds: f64) -> TriCountResult<LoadedGraph> {
        if let Some(expected) = self.config.expected_edges {
            if expected != edges.len() {
                return Err(TriCountError::HeaderMismatch(format!(
                    "expected {} edges, input has {}",
                    expected,
                    edges.len()
                )));
            }
        }

        let start = Instant::now();
        let (graph, stats) = build_csc(edges, self.config.edge_policy)?;
        let build_seconds = start.elapsed().as_secs_f64();

        info!(
            source = label,
            vertices = graph.vertex_count(),
            nnz = graph.edge_count(),
            build_seconds,
            "Adjacency ready"
        );

        Ok(LoadedGraph {
            source: label.to_string(),
            graph,
            stats,
            read_seconds,
            build_seconds,
        })
    }

    /// Count with the configured strategy
    pub fn count(&self, loaded: &LoadedGraph) -> TriCountResult<RunReport> {
        self.count_with(loaded, self.config.strategy)
    }

    /// Count with an explicit strategy, keeping the other settings
    pub fn count_with(&self, loaded: &LoadedGraph, kind: StrategyKind) -> TriCountResult<RunReport> {
        let vertex_count = loaded.graph.vertex_count();
        let config = RunConfig {
            strategy: kind,
            ..self.config.clone()
        };
        config.validate(vertex_count)?;

        let strategy = config.schedule(vertex_count).strategy();
        let outcome = strategy.run(&loaded.graph, config.count_mode())?;

        Ok(RunReport::from_outcome(
            &loaded.source,
            loaded.summary(),
            strategy.name(),
            strategy.threads(),
            (loaded.read_seconds, loaded.build_seconds),
            outcome,
        ))
    }

    /// Load `path` and count with the configured strategy
    pub fn run(&self, path: &Path) -> TriCountResult<RunReport> {
        let loaded = self.load(path)?;
        self.count(&loaded)
    }

    /// Run every strategy on the same adjacency and check that they agree
    pub fn compare(&self, loaded: &LoadedGraph) -> TriCountResult<Vec<RunReport>> {
        let reports = StrategyKind::ALL
            .iter()
            .map(|&kind| self.count_with(loaded, kind))
            .collect::<TriCountResult<Vec<_>>>()?;

        if let Some(first) = reports.first() {
            if let Some(other) = reports.iter().find(|r| r.triangles != first.triangles) {
                return Err(TriCountError::Disagreement(format!(
                    "{} counted {}, {} counted {}",
                    first.strategy, first.triangles, other.strategy, other.triangles
                )));
            }
        }
        Ok(reports)
    }
}
