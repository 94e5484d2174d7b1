//! Serializable run reports

use crate::error::TriCountResult;
use serde::{Deserialize, Serialize};
use tricount_graph_algorithms::{BuildStats, CscGraph, PartitionReport, StrategyOutcome};

/// Size and cleanup statistics of the built adjacency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub vertices: usize,
    /// Entries read from the input
    pub input_edges: usize,
    /// Entries stored in the adjacency after the edge policy
    pub stored_edges: usize,
    pub self_loops_dropped: usize,
    pub duplicates_dropped: usize,
    pub max_degree: usize,
}

impl GraphSummary {
    pub fn new(graph: &CscGraph, stats: &BuildStats) -> Self {
        Self {
            vertices: graph.vertex_count(),
            input_edges: stats.input_edges,
            stored_edges: graph.edge_count(),
            self_loops_dropped: stats.self_loops_dropped,
            duplicates_dropped: stats.duplicates_dropped,
            max_degree: graph.max_degree(),
        }
    }
}

/// One static-partition worker, with durations in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub thread: usize,
    pub start: usize,
    pub end: usize,
    pub triangles: u64,
    pub seconds: f64,
}

impl From<&PartitionReport> for PartitionSummary {
    fn from(report: &PartitionReport) -> Self {
        Self {
            thread: report.thread,
            start: report.start,
            end: report.end,
            triangles: report.triangles,
            seconds: report.elapsed.as_secs_f64(),
        }
    }
}

/// Everything a run produced, ready for the reporting layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Input label (usually the file path)
    pub source: String,
    pub graph: GraphSummary,
    pub strategy: String,
    pub threads: usize,
    pub triangles: u64,
    pub read_seconds: f64,
    pub build_seconds: f64,
    /// Counting time: wall clock, or the slowest worker for static partitions
    pub count_seconds: f64,
    /// Summed worker time
    pub busy_seconds: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub partitions: Vec<PartitionSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub per_vertex: Option<Vec<u64>>,
}

impl RunReport {
    pub(crate) fn from_outcome(
        source: &str,
        graph: GraphSummary,
        strategy: &str,
        threads: usize,
        timings: (f64, f64),
        outcome: StrategyOutcome,
    ) -> Self {
        let (read_seconds, build_seconds) = timings;
        Self {
            source: source.to_string(),
            graph,
            strategy: strategy.to_string(),
            threads,
            triangles: outcome.triangles,
            read_seconds,
            build_seconds,
            count_seconds: outcome.elapsed.as_secs_f64(),
            busy_seconds: outcome.busy.as_secs_f64(),
            partitions: outcome.partitions.iter().map(PartitionSummary::from).collect(),
            per_vertex: outcome.per_vertex,
        }
    }

    pub fn to_json(&self) -> TriCountResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
