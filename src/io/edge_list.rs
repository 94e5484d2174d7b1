//! Plain edge list reader
//!
//! One `u v` pair per line; lines starting with `#` or `%` are comments and
//! any further tokens on a line are ignored.

use super::{data_tokens, parse_index, EdgeSource};
use crate::error::{TriCountError, TriCountResult};
use std::io::BufRead;
use tracing::info;
use tricount_graph_algorithms::{EdgeList, IndexBase};

/// A reader for whitespace-separated edge lists
#[derive(Debug)]
pub struct EdgeListReader<R> {
    reader: R,
    base: IndexBase,
    vertex_count: Option<usize>,
}

impl<R: BufRead> EdgeListReader<R> {
    /// Creates a 0-based reader that derives the vertex count from the data
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            base: IndexBase::Zero,
            vertex_count: None,
        }
    }

    /// Updates the index base of the file
    pub fn base(mut self, base: IndexBase) -> Self {
        self.base = base;
        self
    }

    /// Fixes the vertex count instead of deriving it from the largest index
    pub fn vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = Some(vertex_count);
        self
    }
}

impl<R: BufRead> EdgeSource for EdgeListReader<R> {
    fn read_edges(&mut self) -> TriCountResult<EdgeList> {
        let mut edges = EdgeList::new(self.vertex_count.unwrap_or(0), self.base);
        let mut largest: Option<(usize, usize)> = None;

        for (idx, line) in (&mut self.reader).lines().enumerate() {
            let line = line?;
            if let Some(tokens) = data_tokens(&line, &['#', '%']) {
                let mut tokens = tokens.into_iter();
                let u = parse_index(tokens.next(), idx + 1, "source vertex")?;
                let v = parse_index(tokens.next(), idx + 1, "target vertex")?;
                let top = u.max(v);
                if largest.map_or(true, |(max, _)| top > max) {
                    largest = Some((top, idx + 1));
                }
                edges.push(u, v);
            }
        }

        if self.vertex_count.is_none() {
            edges.vertex_count = match largest {
                Some((max, line)) => max
                    .checked_add(1)
                    .ok_or_else(|| TriCountError::Parse {
                        line,
                        message: format!("vertex id {} is too large", max),
                    })?
                    .saturating_sub(self.base.offset()),
                None => 0,
            };
        }

        info!(
            vertices = edges.vertex_count,
            nnz = edges.len(),
            "Read edge list"
        );
        Ok(edges)
    }
}
