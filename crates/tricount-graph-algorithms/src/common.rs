//! Shared types for triangle counting
//!
//! Provides the raw coordinate edge list consumed by the builder and a
//! read-only Compressed Sparse Column (CSC) view of the topology that the
//! counting kernel runs over.

use crate::error::{BuildError, BuildResult};

/// Vertex identifier (dense, 0-based after normalization)
pub type VertexId = usize;

/// Whether coordinate indices start at 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum IndexBase {
    #[default]
    Zero,
    One,
}

impl IndexBase {
    /// Value subtracted from a raw index to make it 0-based
    pub fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

impl TryFrom<u32> for IndexBase {
    type Error = BuildError;

    fn try_from(flag: u32) -> BuildResult<Self> {
        match flag {
            0 => Ok(IndexBase::Zero),
            1 => Ok(IndexBase::One),
            other => Err(BuildError::InvalidIndexBase(other)),
        }
    }
}

/// Unordered coordinate (COO) edge list as produced by edge ingestion.
///
/// `rows[l]` and `cols[l]` together form edge `l`. Indices are raw, i.e.
/// still offset by `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList {
    /// Number of vertices N
    pub vertex_count: usize,
    /// Index base of the raw coordinates
    pub base: IndexBase,
    /// Row index of each edge
    pub rows: Vec<usize>,
    /// Column index of each edge
    pub cols: Vec<usize>,
}

impl EdgeList {
    pub fn new(vertex_count: usize, base: IndexBase) -> Self {
        Self::with_capacity(vertex_count, base, 0)
    }

    pub fn with_capacity(vertex_count: usize, base: IndexBase, nnz: usize) -> Self {
        Self {
            vertex_count,
            base,
            rows: Vec::with_capacity(nnz),
            cols: Vec::with_capacity(nnz),
        }
    }

    /// Collect `(row, column)` pairs into a list
    pub fn from_pairs<I>(vertex_count: usize, base: IndexBase, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut list = Self::new(vertex_count, base);
        for (row, col) in pairs {
            list.push(row, col);
        }
        list
    }

    pub fn push(&mut self, row: usize, col: usize) {
        self.rows.push(row);
        self.cols.push(col);
    }

    /// Number of entries (nnz)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }
}

/// A dense, integer-indexed view of an undirected graph in CSC format.
///
/// The adjacency list of vertex `i` is
/// `row_index[column_pointer[i]..column_pointer[i + 1]]`, sorted non-decreasing
/// (strictly increasing when built with `EdgePolicy::Simplify` or `EdgePolicy::Reject`).
/// The structure is immutable once built; counting kernels only borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CscGraph {
    vertex_count: usize,
    column_pointer: Vec<usize>,
    row_index: Vec<VertexId>,
}

impl CscGraph {
    /// Internal constructor for parts the builder already guarantees
    pub(crate) fn from_sorted_parts(
        vertex_count: usize,
        column_pointer: Vec<usize>,
        row_index: Vec<VertexId>,
    ) -> Self {
        debug_assert_eq!(column_pointer.len(), vertex_count + 1);
        debug_assert_eq!(column_pointer[vertex_count], row_index.len());
        Self {
            vertex_count,
            column_pointer,
            row_index,
        }
    }

    /// Assemble a graph from existing arrays, checking every structural invariant
    pub fn from_parts(
        vertex_count: usize,
        column_pointer: Vec<usize>,
        row_index: Vec<VertexId>,
    ) -> BuildResult<Self> {
        if vertex_count == 0 {
            return Err(BuildError::EmptyVertexSet);
        }
        if column_pointer.len() != vertex_count + 1 {
            return Err(BuildError::MalformedCsc(format!(
                "column pointer has {} entries, expected {}",
                column_pointer.len(),
                vertex_count + 1
            )));
        }
        if column_pointer[0] != 0 {
            return Err(BuildError::MalformedCsc(
                "column pointer must start at 0".to_string(),
            ));
        }
        if column_pointer[vertex_count] != row_index.len() {
            return Err(BuildError::MalformedCsc(format!(
                "column pointer ends at {}, but row index holds {} entries",
                column_pointer[vertex_count],
                row_index.len()
            )));
        }
        if let Some(col) = column_pointer.windows(2).position(|w| w[0] > w[1]) {
            return Err(BuildError::MalformedCsc(format!(
                "column pointer decreases at column {}",
                col
            )));
        }
        if let Some(&row) = row_index.iter().find(|&&row| row >= vertex_count) {
            return Err(BuildError::MalformedCsc(format!(
                "row index {} outside [0, {})",
                row, vertex_count
            )));
        }

        let graph = Self {
            vertex_count,
            column_pointer,
            row_index,
        };
        if let Some(col) = (0..vertex_count)
            .find(|&col| graph.neighbors(col).windows(2).any(|w| w[0] > w[1]))
        {
            return Err(BuildError::MalformedCsc(format!(
                "adjacency of column {} is not sorted",
                col
            )));
        }
        Ok(graph)
    }

    /// Number of vertices N
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of stored entries (nnz)
    pub fn edge_count(&self) -> usize {
        self.row_index.len()
    }

    pub fn column_pointer(&self) -> &[usize] {
        &self.column_pointer
    }

    pub fn row_index(&self) -> &[VertexId] {
        &self.row_index
    }

    /// Get the adjacency slice of a vertex
    #[inline]
    pub fn neighbors(&self, idx: VertexId) -> &[VertexId] {
        let start = self.column_pointer[idx];
        let end = self.column_pointer[idx + 1];
        &self.row_index[start..end]
    }

    /// Get the number of stored entries in a vertex's column
    pub fn degree(&self, idx: VertexId) -> usize {
        self.column_pointer[idx + 1] - self.column_pointer[idx]
    }

    pub fn max_degree(&self) -> usize {
        (0..self.vertex_count)
            .map(|idx| self.degree(idx))
            .max()
            .unwrap_or(0)
    }

    /// True when every adjacency slice is strictly increasing (no repeats)
    pub fn is_strictly_sorted(&self) -> bool {
        (0..self.vertex_count).all(|col| self.neighbors(col).windows(2).all(|w| w[0] < w[1]))
    }

    /// Reconstruct the 0-based `(row, column)` entries in column order
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        (0..self.vertex_count).flat_map(move |col| {
            self.neighbors(col).iter().map(move |&row| (row, col))
        })
    }
}
