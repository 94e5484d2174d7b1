//! Edge ingestion
//!
//! Readers turn an input file into a raw [`EdgeList`] (row/column pairs plus
//! the vertex count). They validate the file format only; endpoint range
//! checks belong to the builder.

pub mod edge_list;
pub mod matrix_market;

pub use edge_list::EdgeListReader;
pub use matrix_market::{MatrixMarketBanner, MatrixMarketReader};

use crate::config::{InputFormat, RunConfig};
use crate::error::{TriCountError, TriCountResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;
use tricount_graph_algorithms::EdgeList;

/// Source of a coordinate edge list
pub trait EdgeSource {
    fn read_edges(&mut self) -> TriCountResult<EdgeList>;
}

/// Open `path` with the reader the configuration asks for
pub fn open_source(path: &Path, config: &RunConfig) -> TriCountResult<Box<dyn EdgeSource>> {
    let file = BufReader::new(File::open(path)?);
    let format = config.format.resolve(path);
    info!("Reading {:?} as {:?}", path, format);

    let source: Box<dyn EdgeSource> = match format {
        InputFormat::MatrixMarket => Box::new(MatrixMarketReader::new(file)),
        InputFormat::EdgeList | InputFormat::Auto => {
            Box::new(EdgeListReader::new(file).base(config.edge_list_base))
        }
    };
    Ok(source)
}

/// Split a data line into whitespace tokens, skipping blanks and comments
pub(crate) fn data_tokens<'a>(line: &'a str, comment_prefixes: &[char]) -> Option<Vec<&'a str>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(comment_prefixes) {
        return None;
    }
    Some(trimmed.split_whitespace().collect())
}

pub(crate) fn parse_index(token: Option<&str>, line: usize, what: &str) -> TriCountResult<usize> {
    let token = token.ok_or_else(|| TriCountError::Parse {
        line,
        message: format!("missing {}", what),
    })?;
    token.parse().map_err(|_| TriCountError::Parse {
        line,
        message: format!("invalid {} '{}'", what, token),
    })
}
