//! Matrix Market coordinate reader
//!
//! Accepts `%%MatrixMarket matrix coordinate <field> <symmetry>` files with
//! a square size line. Only the first two integers of each entry are used;
//! values are ignored. Indices are 1-based.

use super::{data_tokens, parse_index, EdgeSource};
use crate::error::{TriCountError, TriCountResult};
use std::io::BufRead;
use tracing::{debug, info};
use tricount_graph_algorithms::{EdgeList, IndexBase};

const BANNER: &str = "%%matrixmarket";

/// Upper bound on entries reserved up front from the size line
const MAX_PREALLOCATED_ENTRIES: usize = 1 << 20;

/// Parsed `%%MatrixMarket` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixMarketBanner {
    /// `real`, `integer`, `pattern`, ...
    pub field: String,
    /// `general`, `symmetric`, `skew-symmetric`, ...
    pub symmetry: String,
}

impl MatrixMarketBanner {
    pub fn parse(line: &str) -> TriCountResult<Self> {
        let tokens: Vec<String> = line
            .split_whitespace()
            .map(|token| token.to_ascii_lowercase())
            .collect();

        if tokens.first().map(String::as_str) != Some(BANNER) {
            return Err(TriCountError::Parse {
                line: 1,
                message: "missing %%MatrixMarket banner".to_string(),
            });
        }
        if tokens.len() < 5 {
            return Err(TriCountError::Parse {
                line: 1,
                message: format!("banner has {} fields, expected 5", tokens.len()),
            });
        }

        let (object, format, field, symmetry) = (&tokens[1], &tokens[2], &tokens[3], &tokens[4]);
        if object != "matrix" {
            return Err(TriCountError::UnsupportedFormat(format!("object '{}'", object)));
        }
        if format != "coordinate" {
            return Err(TriCountError::UnsupportedFormat(format!(
                "'{}' storage (only sparse coordinate matrices are supported)",
                format
            )));
        }
        if field == "complex" || symmetry == "hermitian" {
            return Err(TriCountError::UnsupportedFormat(format!(
                "{} {} matrices",
                field, symmetry
            )));
        }

        Ok(Self {
            field: field.clone(),
            symmetry: symmetry.clone(),
        })
    }
}

/// Reads a Matrix Market file into a 1-based edge list
pub struct MatrixMarketReader<R> {
    reader: R,
    banner: Option<MatrixMarketBanner>,
}

impl<R: BufRead> MatrixMarketReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            banner: None,
        }
    }

    /// Banner of the last file read
    pub fn banner(&self) -> Option<&MatrixMarketBanner> {
        self.banner.as_ref()
    }
}

impl<R: BufRead> EdgeSource for MatrixMarketReader<R> {
    fn read_edges(&mut self) -> TriCountResult<EdgeList> {
        let mut lines = (&mut self.reader).lines().enumerate().map(|(idx, line)| (idx + 1, line));

        let banner = match lines.next() {
            Some((_, line)) => MatrixMarketBanner::parse(&line?)?,
            None => {
                return Err(TriCountError::Parse {
                    line: 1,
                    message: "empty input".to_string(),
                })
            }
        };
        debug!(field = %banner.field, symmetry = %banner.symmetry, "Matrix Market banner");

        let mut size = None;
        for (number, line) in lines.by_ref() {
            let line = line?;
            if let Some(tokens) = data_tokens(&line, &['%']) {
                let mut tokens = tokens.into_iter();
                let rows = parse_index(tokens.next(), number, "row count")?;
                let cols = parse_index(tokens.next(), number, "column count")?;
                let nnz = parse_index(tokens.next(), number, "entry count")?;
                size = Some((rows, cols, nnz));
                break;
            }
        }
        let (rows, cols, nnz) = size.ok_or_else(|| {
            TriCountError::HeaderMismatch("missing size line".to_string())
        })?;
        if rows != cols {
            return Err(TriCountError::UnsupportedFormat(format!(
                "non-square {}x{} matrix",
                rows, cols
            )));
        }

        // The declared count is untrusted until the entries are actually read
        let mut edges =
            EdgeList::with_capacity(rows, IndexBase::One, nnz.min(MAX_PREALLOCATED_ENTRIES));
        for (number, line) in lines {
            if edges.len() == nnz {
                break;
            }
            let line = line?;
            if let Some(tokens) = data_tokens(&line, &['%']) {
                let mut tokens = tokens.into_iter();
                let row = parse_index(tokens.next(), number, "row index")?;
                let col = parse_index(tokens.next(), number, "column index")?;
                edges.push(row, col);
            }
        }

        if edges.len() != nnz {
            return Err(TriCountError::HeaderMismatch(format!(
                "declared {} entries, found {}",
                nnz,
                edges.len()
            )));
        }

        info!(
            vertices = rows,
            nnz,
            symmetry = %banner.symmetry,
            "Read Matrix Market graph"
        );
        self.banner = Some(banner);
        Ok(edges)
    }
}
