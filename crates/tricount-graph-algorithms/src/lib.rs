pub mod common;
pub mod error;
pub mod builder;
pub mod topology;
pub mod schedule;
pub mod generators;

pub use common::{CscGraph, EdgeList, IndexBase, VertexId};
pub use error::{Axis, BuildError, BuildResult, ScheduleError, ScheduleResult};
pub use builder::{build_csc, coo_to_csc, BuildStats, EdgePolicy};
pub use topology::{
    count_triangles, count_triangles_brute_force, count_triangles_per_vertex, merge_join,
    triangles_at, TriangleCount, TriangleSink,
};
pub use schedule::{
    partition_ranges, CountMode, DynamicParallel, ExecutionStrategy, PartitionReport, Schedule,
    Sequential, StaticPartition, StrategyOutcome,
};
