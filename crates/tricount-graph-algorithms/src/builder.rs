//! COO → CSC conversion
//!
//! Bucket-by-column counting sort followed by an explicit per-slice sort, so
//! every adjacency slice is ordered no matter how the edge stream arrived.

use super::common::{CscGraph, EdgeList, IndexBase, VertexId};
use super::error::{Axis, BuildError, BuildResult};
use rayon::prelude::*;
use tracing::{debug, warn};

/// How self-loops, repeated edges and edge orientation are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EdgePolicy {
    /// Keep every entry exactly as given; slices are sorted non-decreasing.
    Preserve,
    /// Store each undirected edge once with row > column, dropping
    /// self-loops and collapsing duplicates.
    #[default]
    Simplify,
    /// Same orientation as `Simplify`, but a self-loop or duplicate is an error.
    Reject,
}

/// Counters describing what the builder did to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildStats {
    pub input_edges: usize,
    pub self_loops_dropped: usize,
    pub duplicates_dropped: usize,
}

/// Convert a coordinate edge list into a CSC graph.
///
/// Consumes the edge list; it is not needed once the index structure exists.
pub fn coo_to_csc(edges: EdgeList, policy: EdgePolicy) -> BuildResult<CscGraph> {
    build_csc(edges, policy).map(|(graph, _)| graph)
}

/// Like [`coo_to_csc`], also returning what was dropped along the way
pub fn build_csc(edges: EdgeList, policy: EdgePolicy) -> BuildResult<(CscGraph, BuildStats)> {
    let EdgeList {
        vertex_count: n,
        base,
        mut rows,
        mut cols,
    } = edges;

    if n == 0 {
        return Err(BuildError::EmptyVertexSet);
    }
    if rows.len() != cols.len() {
        return Err(BuildError::LengthMismatch {
            rows: rows.len(),
            cols: cols.len(),
        });
    }

    let mut stats = BuildStats {
        input_edges: rows.len(),
        ..BuildStats::default()
    };

    normalize(&mut rows, &mut cols, n, base, policy, &mut stats)?;

    let nnz = rows.len();
    let mut column_pointer = vec![0usize; n + 1];

    // Histogram: per-column counts
    for &col in &cols {
        column_pointer[col] += 1;
    }

    // Prefix sum: counts -> starting offsets
    let mut cumsum = 0;
    for slot in column_pointer.iter_mut().take(n) {
        let count = *slot;
        *slot = cumsum;
        cumsum += count;
    }
    column_pointer[n] = nnz;

    // Scatter: each pointer doubles as the column's write cursor
    let mut row_index: Vec<VertexId> = vec![0; nnz];
    for (&row, &col) in rows.iter().zip(&cols) {
        let dst = column_pointer[col];
        row_index[dst] = row;
        column_pointer[col] += 1;
    }
    drop(rows);
    drop(cols);

    // Revert: cursors now hold each column's end, which is the next column's start
    let mut last = 0;
    for slot in column_pointer.iter_mut().take(n) {
        let end = *slot;
        *slot = last;
        last = end;
    }

    sort_slices(&column_pointer, &mut row_index);

    if policy != EdgePolicy::Preserve {
        stats.duplicates_dropped = collapse_duplicates(&mut column_pointer, &mut row_index, policy)?;
    }

    if stats.self_loops_dropped > 0 || stats.duplicates_dropped > 0 {
        warn!(
            self_loops = stats.self_loops_dropped,
            duplicates = stats.duplicates_dropped,
            "Dropped entries while building adjacency"
        );
    }
    debug!(
        vertices = n,
        nnz = row_index.len(),
        ?policy,
        "Built CSC adjacency"
    );

    Ok((CscGraph::from_sorted_parts(n, column_pointer, row_index), stats))
}

/// Range-check every endpoint, shift to 0-based, and orient or drop entries per policy
fn normalize(
    rows: &mut Vec<usize>,
    cols: &mut Vec<usize>,
    n: usize,
    base: IndexBase,
    policy: EdgePolicy,
    stats: &mut BuildStats,
) -> BuildResult<()> {
    let offset = base.offset();
    let mut kept = 0;

    for position in 0..rows.len() {
        let row = to_zero_based(rows[position], position, Axis::Row, n, offset)?;
        let col = to_zero_based(cols[position], position, Axis::Column, n, offset)?;

        let (row, col) = match policy {
            EdgePolicy::Preserve => (row, col),
            EdgePolicy::Simplify | EdgePolicy::Reject => {
                if row == col {
                    if policy == EdgePolicy::Reject {
                        return Err(BuildError::SelfLoop(row));
                    }
                    stats.self_loops_dropped += 1;
                    continue;
                }
                (row.max(col), row.min(col))
            }
        };

        rows[kept] = row;
        cols[kept] = col;
        kept += 1;
    }

    rows.truncate(kept);
    cols.truncate(kept);
    Ok(())
}

fn to_zero_based(
    value: usize,
    position: usize,
    axis: Axis,
    n: usize,
    offset: usize,
) -> BuildResult<VertexId> {
    match value.checked_sub(offset) {
        Some(idx) if idx < n => Ok(idx),
        _ => Err(BuildError::OutOfRange {
            position,
            axis,
            value,
            min: offset,
            max: n - 1 + offset,
        }),
    }
}

/// Sort every adjacency slice independently
fn sort_slices(column_pointer: &[usize], row_index: &mut [VertexId]) {
    let mut slices = Vec::with_capacity(column_pointer.len() - 1);
    let mut rest = row_index;
    for bounds in column_pointer.windows(2) {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(bounds[1] - bounds[0]);
        slices.push(head);
        rest = tail;
    }
    slices.par_iter_mut().for_each(|slice| slice.sort_unstable());
}

/// Compact repeated rows out of each sorted slice and rewrite the pointers.
///
/// Returns the number of entries removed.
fn collapse_duplicates(
    column_pointer: &mut [usize],
    row_index: &mut Vec<VertexId>,
    policy: EdgePolicy,
) -> BuildResult<usize> {
    let n = column_pointer.len() - 1;
    let mut write = 0;
    let mut start = column_pointer[0];

    for col in 0..n {
        let end = column_pointer[col + 1];
        let slice_start = write;
        for read in start..end {
            let row = row_index[read];
            if write > slice_start && row_index[write - 1] == row {
                if policy == EdgePolicy::Reject {
                    return Err(BuildError::DuplicateEdge { row, col });
                }
                continue;
            }
            row_index[write] = row;
            write += 1;
        }
        column_pointer[col] = slice_start;
        start = end;
    }

    let dropped = row_index.len() - write;
    column_pointer[n] = write;
    row_index.truncate(write);
    Ok(dropped)
}
