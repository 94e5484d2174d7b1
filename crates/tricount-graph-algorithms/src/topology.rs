//! Triangle counting kernel
//!
//! For every vertex `i` and every neighbour `j` in its adjacency slice, the
//! sorted slices of `i` and `j` are intersected with a merge-join. Each common
//! entry `k` closes the triangle `(i, j, k)`.
//!
//! With each undirected edge stored once (lower-triangular orientation) every
//! triangle is discovered exactly once. Per-vertex counters receive one
//! increment for each of the three corners, so the total equals the counter
//! sum divided by 3.

use super::common::{CscGraph, VertexId};
use std::cmp::Ordering;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Receives the corners of every triangle the kernel closes
pub trait TriangleSink {
    fn record(&mut self, i: VertexId, j: VertexId, k: VertexId);
}

/// Discards per-vertex attribution; callers keep only the returned delta
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalOnly;

impl TriangleSink for TotalOnly {
    #[inline(always)]
    fn record(&mut self, _i: VertexId, _j: VertexId, _k: VertexId) {}
}

/// Private per-vertex counters
impl TriangleSink for [u64] {
    #[inline]
    fn record(&mut self, i: VertexId, j: VertexId, k: VertexId) {
        self[i] += 1;
        self[j] += 1;
        self[k] += 1;
    }
}

/// Shared per-vertex counters, safe to update from many workers at once
#[derive(Debug, Clone, Copy)]
pub struct AtomicTally<'a>(pub &'a [AtomicU64]);

impl TriangleSink for AtomicTally<'_> {
    #[inline]
    fn record(&mut self, i: VertexId, j: VertexId, k: VertexId) {
        self.0[i].fetch_add(1, AtomicOrdering::Relaxed);
        self.0[j].fetch_add(1, AtomicOrdering::Relaxed);
        self.0[k].fetch_add(1, AtomicOrdering::Relaxed);
    }
}

/// Total and per-vertex triangle counts
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriangleCount {
    pub total: u64,
    /// Number of triangles each vertex takes part in
    pub per_vertex: Vec<u64>,
}

impl TriangleCount {
    /// Normalise raw counters: every triangle incremented three of them
    pub fn from_per_vertex(per_vertex: Vec<u64>) -> Self {
        let total = per_vertex.iter().sum::<u64>() / 3;
        Self { total, per_vertex }
    }
}

/// Merge-join two sorted slices, calling `on_match` for each common entry.
///
/// Returns the number of matches.
#[inline]
pub fn merge_join<F>(left: &[VertexId], right: &[VertexId], mut on_match: F) -> u64
where
    F: FnMut(VertexId),
{
    let mut p1 = 0;
    let mut p2 = 0;
    let mut common = 0;

    while p1 < left.len() && p2 < right.len() {
        match left[p1].cmp(&right[p2]) {
            Ordering::Less => p1 += 1,
            Ordering::Greater => p2 += 1,
            Ordering::Equal => {
                on_match(left[p1]);
                p1 += 1;
                p2 += 1;
                common += 1;
            }
        }
    }

    common
}

/// Triangles closed from vertex `i`: sum over its neighbours `j` of |N(i) ∩ N(j)|
#[inline]
pub fn triangles_at<S>(graph: &CscGraph, i: VertexId, sink: &mut S) -> u64
where
    S: TriangleSink + ?Sized,
{
    let own = graph.neighbors(i);
    let mut found = 0;
    for &j in own {
        found += merge_join(own, graph.neighbors(j), |k| sink.record(i, j, k));
    }
    found
}

/// Run the kernel over a contiguous range of outer vertices
pub fn triangles_in_range<S>(graph: &CscGraph, range: Range<VertexId>, sink: &mut S) -> u64
where
    S: TriangleSink + ?Sized,
{
    range.map(|i| triangles_at(graph, i, &mut *sink)).sum()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph, single-threaded.
pub fn count_triangles(graph: &CscGraph) -> u64 {
    triangles_in_range(graph, 0..graph.vertex_count(), &mut TotalOnly)
}

/// Sequential count with a per-vertex breakdown
pub fn count_triangles_per_vertex(graph: &CscGraph) -> TriangleCount {
    let mut counts = vec![0u64; graph.vertex_count()];
    let found = triangles_in_range(graph, 0..graph.vertex_count(), counts.as_mut_slice());
    let result = TriangleCount::from_per_vertex(counts);
    debug_assert_eq!(result.total, found);
    result
}

/// O(N³) enumeration over vertex triples of the undirected simple graph
/// underlying `graph`. Reference check for small inputs only.
pub fn count_triangles_brute_force(graph: &CscGraph) -> u64 {
    let n = graph.vertex_count();
    let mut adjacent = vec![false; n * n];
    for (row, col) in graph.edges() {
        if row != col {
            adjacent[row * n + col] = true;
            adjacent[col * n + row] = true;
        }
    }

    let mut total = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            if !adjacent[i * n + j] {
                continue;
            }
            for k in (j + 1)..n {
                if adjacent[i * n + k] && adjacent[j * n + k] {
                    total += 1;
                }
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{coo_to_csc, EdgePolicy};
    use crate::common::{EdgeList, IndexBase};
    use crate::generators;

    fn simple(edges: EdgeList) -> CscGraph {
        coo_to_csc(edges, EdgePolicy::Simplify).unwrap()
    }

    #[test]
    fn test_merge_join() {
        let mut seen = Vec::new();
        let common = merge_join(&[1, 3, 5, 7, 9], &[2, 3, 4, 9, 11], |k| seen.push(k));
        assert_eq!(common, 2);
        assert_eq!(seen, vec![3, 9]);

        assert_eq!(merge_join(&[], &[1, 2], |_| {}), 0);
    }

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: 4 nodes, all connected.
        // Triangles: (0,1,2), (0,1,3), (0,2,3), (1,2,3) -> 4 triangles.
        let graph = simple(generators::complete(4));
        assert_eq!(count_triangles(&graph), 4);

        let result = count_triangles_per_vertex(&graph);
        assert_eq!(result.total, 4);
        assert_eq!(result.per_vertex, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_single_triangle() {
        let edges = EdgeList::from_pairs(3, IndexBase::Zero, vec![(0, 1), (1, 2), (0, 2)]);
        let graph = simple(edges);
        assert_eq!(count_triangles(&graph), 1);
        assert_eq!(count_triangles_per_vertex(&graph).per_vertex, vec![1, 1, 1]);
    }

    #[test]
    fn test_preserved_orientation_counts_each_triangle_once() {
        let upper = EdgeList::from_pairs(3, IndexBase::Zero, vec![(0, 1), (1, 2), (0, 2)]);
        let graph = coo_to_csc(upper, EdgePolicy::Preserve).unwrap();
        assert_eq!(count_triangles(&graph), 1);
        assert_eq!(count_triangles_per_vertex(&graph).per_vertex, vec![1, 1, 1]);

        let lower = generators::complete(4);
        let upper = EdgeList::from_pairs(4, IndexBase::Zero, lower.iter().map(|(r, c)| (c, r)));
        for edges in [lower, upper] {
            let graph = coo_to_csc(edges, EdgePolicy::Preserve).unwrap();
            assert_eq!(count_triangles(&graph), 4);
            assert_eq!(count_triangles_per_vertex(&graph).per_vertex, vec![3, 3, 3, 3]);
        }
    }

    #[test]
    fn test_symmetric_input_collapses_to_one_triangle() {
        let edges = EdgeList::from_pairs(
            3,
            IndexBase::Zero,
            vec![(0, 1), (1, 0), (1, 2), (2, 1), (0, 2), (2, 0)],
        );
        assert_eq!(count_triangles(&simple(edges)), 1);
    }

    #[test]
    fn test_star_has_no_triangles() {
        for leaves in [1, 2, 5, 40] {
            let graph = simple(generators::star(leaves));
            assert_eq!(count_triangles(&graph), 0);
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = simple(EdgeList::new(7, IndexBase::Zero));
        assert_eq!(count_triangles(&graph), 0);
        assert_eq!(count_triangles_per_vertex(&graph).per_vertex, vec![0; 7]);
    }

    #[test]
    fn test_per_vertex_attribution() {
        // Two triangles sharing edge (1, 2): {0,1,2} and {1,2,3}, plus a pendant 4.
        let edges = EdgeList::from_pairs(
            5,
            IndexBase::Zero,
            vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4)],
        );
        let result = count_triangles_per_vertex(&simple(edges));
        assert_eq!(result.total, 2);
        assert_eq!(result.per_vertex, vec![1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_matches_brute_force_on_random_graphs() {
        for seed in 0..12 {
            let p = 0.05 + 0.05 * (seed % 6) as f64;
            let graph = simple(generators::erdos_renyi(40, p, seed));
            assert_eq!(
                count_triangles(&graph),
                count_triangles_brute_force(&graph),
                "seed {seed}, p {p}"
            );
        }
    }

    #[test]
    fn test_complete_graphs() {
        for n in 3..12u64 {
            let graph = simple(generators::complete(n as usize));
            assert_eq!(count_triangles(&graph), n * (n - 1) * (n - 2) / 6);
        }
    }
}
