//! Synthetic graph generators
//!
//! Each generator emits every undirected edge once, as 0-based `(row, column)`
//! with row > column.

use super::common::{EdgeList, IndexBase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Complete graph K_n
pub fn complete(n: usize) -> EdgeList {
    let mut edges = EdgeList::with_capacity(n, IndexBase::Zero, n * n.saturating_sub(1) / 2);
    for col in 0..n {
        for row in (col + 1)..n {
            edges.push(row, col);
        }
    }
    edges
}

/// Star with hub 0 and `leaves` leaf vertices
pub fn star(leaves: usize) -> EdgeList {
    EdgeList::from_pairs(leaves + 1, IndexBase::Zero, (1..=leaves).map(|leaf| (leaf, 0)))
}

/// Simple cycle 0 - 1 - ... - (n-1) - 0
pub fn cycle(n: usize) -> EdgeList {
    let mut edges = EdgeList::with_capacity(n, IndexBase::Zero, n);
    for v in 1..n {
        edges.push(v, v - 1);
    }
    if n > 2 {
        edges.push(n - 1, 0);
    }
    edges
}

/// Erdős–Rényi G(n, p), reproducible from `seed`
pub fn erdos_renyi(n: usize, p: f64, seed: u64) -> EdgeList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = EdgeList::new(n, IndexBase::Zero);
    for col in 0..n {
        for row in (col + 1)..n {
            if rng.gen_bool(p) {
                edges.push(row, col);
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_sizes() {
        assert_eq!(complete(5).len(), 10);
        assert_eq!(star(4).vertex_count, 5);
        assert_eq!(star(4).len(), 4);
        assert_eq!(cycle(6).len(), 6);
        assert_eq!(cycle(2).len(), 1);
    }

    #[test]
    fn test_erdos_renyi_is_reproducible() {
        assert_eq!(erdos_renyi(30, 0.2, 9), erdos_renyi(30, 0.2, 9));
        assert_eq!(erdos_renyi(30, 0.0, 9).len(), 0);
        assert_eq!(erdos_renyi(30, 1.0, 9).len(), complete(30).len());
        assert!(erdos_renyi(30, 0.3, 1).iter().all(|(row, col)| row > col));
    }
}
