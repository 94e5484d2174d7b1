//! Execution strategies for the triangle kernel
//!
//! The merge-join kernel lives in [`crate::topology`]; strategies differ only
//! in how the outer vertex loop is scheduled:
//! - [`Sequential`]: one thread, vertices in order.
//! - [`DynamicParallel`]: rayon pool, chunks of vertices stolen on demand.
//! - [`StaticPartition`]: fixed threads, one contiguous range each.
//!
//! Workers never share mutable state beyond atomic counters; partial results
//! are combined only after every worker has finished.

use super::common::{CscGraph, VertexId};
use super::error::{ScheduleError, ScheduleResult};
use super::topology::{triangles_at, triangles_in_range, AtomicTally, TotalOnly};
use rayon::prelude::*;
use std::ops::Range;
use std::sync::atomic::AtomicU64;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Whether to attribute triangles to vertices or only count them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    #[default]
    Total,
    PerVertex,
}

/// Result of one static-partition worker
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionReport {
    pub thread: usize,
    /// First vertex handled (inclusive)
    pub start: VertexId,
    /// Last vertex handled (exclusive)
    pub end: VertexId,
    pub triangles: u64,
    pub elapsed: Duration,
}

/// Combined result of a strategy run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyOutcome {
    pub triangles: u64,
    /// Present when run with [`CountMode::PerVertex`]
    pub per_vertex: Option<Vec<u64>>,
    /// Wall-clock time; for static partitions the slowest worker's time
    pub elapsed: Duration,
    /// Summed worker time; equals `elapsed` for single-clock strategies
    pub busy: Duration,
    /// One entry per worker for static partitions, empty otherwise
    pub partitions: Vec<PartitionReport>,
}

impl StrategyOutcome {
    fn single_clock(triangles: u64, per_vertex: Option<Vec<u64>>, elapsed: Duration) -> Self {
        Self {
            triangles,
            per_vertex,
            elapsed,
            busy: elapsed,
            partitions: Vec::new(),
        }
    }
}

/// Outer-loop scheduling policy wrapped around the shared kernel
pub trait ExecutionStrategy: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Number of worker threads the strategy uses
    fn threads(&self) -> usize;

    /// Check the configuration against the graph; runs before any thread starts
    fn validate(&self, graph: &CscGraph) -> ScheduleResult<()>;

    /// Count triangles; assumes `validate` passed
    fn execute(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome>;

    fn run(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome> {
        self.validate(graph)?;
        info!(
            strategy = self.name(),
            threads = self.threads(),
            vertices = graph.vertex_count(),
            nnz = graph.edge_count(),
            "Counting triangles"
        );
        let outcome = self.execute(graph, mode)?;
        info!(
            strategy = self.name(),
            triangles = outcome.triangles,
            elapsed = ?outcome.elapsed,
            "Counting finished"
        );
        Ok(outcome)
    }
}

fn check_thread_count(threads: usize, vertex_count: usize) -> ScheduleResult<()> {
    if threads == 0 || threads > vertex_count {
        return Err(ScheduleError::InvalidThreadCount {
            threads,
            vertex_count,
        });
    }
    Ok(())
}

/// Count over a range with private counters when per-vertex results are wanted
fn count_range(
    graph: &CscGraph,
    range: Range<VertexId>,
    mode: CountMode,
) -> (u64, Option<Vec<u64>>) {
    match mode {
        CountMode::Total => (triangles_in_range(graph, range, &mut TotalOnly), None),
        CountMode::PerVertex => {
            let mut counts = vec![0u64; graph.vertex_count()];
            let found = triangles_in_range(graph, range, counts.as_mut_slice());
            (found, Some(counts))
        }
    }
}

/// Single-threaded reference strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ExecutionStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn threads(&self) -> usize {
        1
    }

    fn validate(&self, _graph: &CscGraph) -> ScheduleResult<()> {
        Ok(())
    }

    fn execute(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome> {
        let start = Instant::now();
        let (triangles, per_vertex) = count_range(graph, 0..graph.vertex_count(), mode);
        Ok(StrategyOutcome::single_clock(triangles, per_vertex, start.elapsed()))
    }
}

/// Shared-memory parallel loop with dynamic chunk assignment.
///
/// Outer vertices are split into chunks of at least `chunk_size`; idle rayon
/// workers steal chunks from busy ones, which balances skewed degrees. The
/// scalar total is a rayon sum reduction of per-vertex triangle deltas.
#[derive(Debug, Clone, Copy)]
pub struct DynamicParallel {
    pub threads: usize,
    pub chunk_size: usize,
}

impl DynamicParallel {
    pub fn new(threads: usize, chunk_size: usize) -> Self {
        Self {
            threads,
            chunk_size,
        }
    }
}

impl ExecutionStrategy for DynamicParallel {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn validate(&self, graph: &CscGraph) -> ScheduleResult<()> {
        check_thread_count(self.threads, graph.vertex_count())?;
        if self.chunk_size == 0 {
            return Err(ScheduleError::InvalidChunkSize);
        }
        Ok(())
    }

    fn execute(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|idx| format!("tricount-dynamic-{}", idx))
            .build()?;

        let n = graph.vertex_count();
        let chunk_size = self.chunk_size;
        let start = Instant::now();

        let (triangles, per_vertex) = pool.install(|| match mode {
            CountMode::Total => {
                let total: u64 = (0..n)
                    .into_par_iter()
                    .with_min_len(chunk_size)
                    .map(|i| triangles_at(graph, i, &mut TotalOnly))
                    .sum();
                (total, None)
            }
            CountMode::PerVertex => {
                let counters: Vec<AtomicU64> = (0..n).map(|_| AtomicU64::new(0)).collect();
                let tally = AtomicTally(&counters);
                let total: u64 = (0..n)
                    .into_par_iter()
                    .with_min_len(chunk_size)
                    .map(|i| {
                        let mut sink = tally;
                        triangles_at(graph, i, &mut sink)
                    })
                    .sum();
                let counts: Vec<u64> = counters.into_iter().map(AtomicU64::into_inner).collect();
                (total, Some(counts))
            }
        });

        Ok(StrategyOutcome::single_clock(triangles, per_vertex, start.elapsed()))
    }
}

/// Fixed worker threads, each owning one contiguous vertex range
#[derive(Debug, Clone, Copy)]
pub struct StaticPartition {
    pub threads: usize,
}

impl StaticPartition {
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }
}

/// Split `0..vertex_count` into `threads` ranges of `vertex_count / threads`
/// vertices; the last range also takes the remainder.
pub fn partition_ranges(vertex_count: usize, threads: usize) -> ScheduleResult<Vec<Range<VertexId>>> {
    check_thread_count(threads, vertex_count)?;

    let bound = vertex_count / threads;
    Ok((0..threads)
        .map(|thread| {
            let start = thread * bound;
            let end = if thread == threads - 1 {
                vertex_count
            } else {
                start + bound
            };
            start..end
        })
        .collect())
}

fn run_partition(
    graph: &CscGraph,
    thread: usize,
    range: Range<VertexId>,
    mode: CountMode,
) -> (PartitionReport, Option<Vec<u64>>) {
    let start = Instant::now();
    let (triangles, per_vertex) = count_range(graph, range.clone(), mode);
    let elapsed = start.elapsed();

    debug!(
        thread,
        start = range.start,
        end = range.end,
        triangles,
        ?elapsed,
        "Partition finished"
    );

    let report = PartitionReport {
        thread,
        start: range.start,
        end: range.end,
        triangles,
        elapsed,
    };
    (report, per_vertex)
}

impl ExecutionStrategy for StaticPartition {
    fn name(&self) -> &'static str {
        "static"
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn validate(&self, graph: &CscGraph) -> ScheduleResult<()> {
        check_thread_count(self.threads, graph.vertex_count())
    }

    fn execute(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome> {
        let ranges = partition_ranges(graph.vertex_count(), self.threads)?;

        let results: ScheduleResult<Vec<_>> = thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    thread::Builder::new()
                        .name(format!("tricount-static-{}", worker))
                        .spawn_scoped(scope, move || run_partition(graph, worker, range, mode))
                        .map_err(|source| ScheduleError::Spawn {
                            thread: worker,
                            source,
                        })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle?
                        .join()
                        .map_err(|_| ScheduleError::WorkerPanicked(worker))
                })
                .collect()
        });

        let mut outcome = StrategyOutcome {
            triangles: 0,
            per_vertex: None,
            elapsed: Duration::ZERO,
            busy: Duration::ZERO,
            partitions: Vec::with_capacity(self.threads),
        };

        for (report, local_counts) in results? {
            outcome.triangles += report.triangles;
            outcome.elapsed = outcome.elapsed.max(report.elapsed);
            outcome.busy += report.elapsed;

            if let Some(local_counts) = local_counts {
                match outcome.per_vertex.as_mut() {
                    Some(merged) => merged
                        .iter_mut()
                        .zip(local_counts)
                        .for_each(|(slot, count)| *slot += count),
                    None => outcome.per_vertex = Some(local_counts),
                }
            }
            outcome.partitions.push(report);
        }

        Ok(outcome)
    }
}

/// Strategy selection by value, e.g. from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Sequential,
    Dynamic { threads: usize, chunk_size: usize },
    Static { threads: usize },
}

impl Schedule {
    pub fn strategy(&self) -> Box<dyn ExecutionStrategy> {
        match *self {
            Schedule::Sequential => Box::new(Sequential),
            Schedule::Dynamic {
                threads,
                chunk_size,
            } => Box::new(DynamicParallel::new(threads, chunk_size)),
            Schedule::Static { threads } => Box::new(StaticPartition::new(threads)),
        }
    }

    pub fn run(&self, graph: &CscGraph, mode: CountMode) -> ScheduleResult<StrategyOutcome> {
        self.strategy().run(graph, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{coo_to_csc, EdgePolicy};
    use crate::common::{EdgeList, IndexBase};
    use crate::generators;
    use crate::topology::{count_triangles, count_triangles_per_vertex};

    fn random_graph(n: usize, p: f64, seed: u64) -> CscGraph {
        coo_to_csc(generators::erdos_renyi(n, p, seed), EdgePolicy::Simplify).unwrap()
    }

    #[test]
    fn test_partition_ranges_cover_exactly() {
        let ranges = partition_ranges(10, 3).unwrap();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);

        let ranges = partition_ranges(7, 7).unwrap();
        assert!(ranges.iter().all(|r| r.len() == 1));

        assert_eq!(partition_ranges(5, 1).unwrap(), vec![0..5]);
    }

    #[test]
    fn test_invalid_thread_counts() {
        assert!(matches!(
            partition_ranges(4, 0),
            Err(ScheduleError::InvalidThreadCount { threads: 0, vertex_count: 4 })
        ));
        assert!(matches!(
            partition_ranges(4, 5),
            Err(ScheduleError::InvalidThreadCount { threads: 5, vertex_count: 4 })
        ));

        let graph = random_graph(4, 0.5, 1);
        assert!(StaticPartition::new(9).run(&graph, CountMode::Total).is_err());
        assert!(DynamicParallel::new(0, 8).run(&graph, CountMode::Total).is_err());
        assert!(matches!(
            DynamicParallel::new(2, 0).run(&graph, CountMode::Total),
            Err(ScheduleError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_strategies_agree_for_every_thread_count() {
        let graph = random_graph(24, 0.3, 7);
        let expected = count_triangles(&graph);
        assert!(expected > 0);

        for threads in 1..=graph.vertex_count() {
            let dynamic = DynamicParallel::new(threads, 1 + threads % 5)
                .run(&graph, CountMode::Total)
                .unwrap();
            let fixed = StaticPartition::new(threads)
                .run(&graph, CountMode::Total)
                .unwrap();
            assert_eq!(dynamic.triangles, expected, "dynamic, {threads} threads");
            assert_eq!(fixed.triangles, expected, "static, {threads} threads");
            assert_eq!(fixed.partitions.len(), threads);
        }
    }

    #[test]
    fn test_per_vertex_results_agree() {
        let graph = random_graph(60, 0.2, 42);
        let reference = count_triangles_per_vertex(&graph);

        for schedule in [
            Schedule::Sequential,
            Schedule::Dynamic { threads: 4, chunk_size: 3 },
            Schedule::Static { threads: 7 },
        ] {
            let outcome = schedule.run(&graph, CountMode::PerVertex).unwrap();
            assert_eq!(outcome.triangles, reference.total, "{schedule:?}");
            assert_eq!(outcome.per_vertex.as_ref(), Some(&reference.per_vertex), "{schedule:?}");
        }
    }

    #[test]
    fn test_strategies_agree_on_preserved_graph() {
        // Upper-triangular copy of a random simple graph, built as given
        let lower = generators::erdos_renyi(30, 0.25, 11);
        let upper = EdgeList::from_pairs(30, IndexBase::Zero, lower.iter().map(|(r, c)| (c, r)));
        let graph = coo_to_csc(upper, EdgePolicy::Preserve).unwrap();
        let reference = count_triangles_per_vertex(&graph);
        assert_eq!(reference.total, count_triangles(&random_graph(30, 0.25, 11)));

        for schedule in [
            Schedule::Sequential,
            Schedule::Dynamic { threads: 3, chunk_size: 2 },
            Schedule::Static { threads: 4 },
        ] {
            let outcome = schedule.run(&graph, CountMode::PerVertex).unwrap();
            assert_eq!(outcome.triangles, reference.total, "{schedule:?}");
            assert_eq!(outcome.per_vertex.as_ref(), Some(&reference.per_vertex), "{schedule:?}");
        }
    }

    #[test]
    fn test_one_vertex_per_thread() {
        let graph = coo_to_csc(generators::complete(6), EdgePolicy::Simplify).unwrap();
        let outcome = StaticPartition::new(6).run(&graph, CountMode::Total).unwrap();

        assert_eq!(outcome.triangles, 20);
        for report in &outcome.partitions {
            assert_eq!(report.end - report.start, 1);
        }
        let local_sum: u64 = outcome.partitions.iter().map(|r| r.triangles).sum();
        assert_eq!(local_sum, 20);
        assert!(outcome.busy >= outcome.elapsed);
    }

    #[test]
    fn test_static_timing_and_ranges_reported() {
        let graph = random_graph(10, 0.4, 3);
        let outcome = StaticPartition::new(3).run(&graph, CountMode::Total).unwrap();

        let ranges: Vec<_> = outcome.partitions.iter().map(|r| r.start..r.end).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
        let slowest = outcome.partitions.iter().map(|r| r.elapsed).max().unwrap();
        assert_eq!(outcome.elapsed, slowest);
        assert!(outcome.per_vertex.is_none());
    }

    #[test]
    fn test_empty_graph_all_strategies() {
        let graph = coo_to_csc(EdgeList::new(5, IndexBase::Zero), EdgePolicy::Simplify).unwrap();
        for schedule in [
            Schedule::Sequential,
            Schedule::Dynamic { threads: 2, chunk_size: 1 },
            Schedule::Static { threads: 5 },
        ] {
            assert_eq!(schedule.run(&graph, CountMode::Total).unwrap().triangles, 0);
        }
    }
}
