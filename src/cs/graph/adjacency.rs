//! Graph representations consumed by the min-cut engines.
//!
//! Two shapes are provided:
//!
//! * [`AdjacencyMatrix`] - a dense `V x V` symmetric weight matrix backed by
//!   [`ndarray::Array2`]. This is what the dense Stoer-Wagner engine contracts
//!   in place.
//! * [`AdjacencyList`] - a sparse map per vertex, used by the heap-driven
//!   Stoer-Wagner variant.
//!
//! Both can produce the induced edge list (`src < dst`, `weight > 0`, no
//! duplicates) that the contraction engine samples from.

use bitvec::prelude::*;
use ndarray::Array2;
use num_traits::{CheckedAdd, Float, Zero};
use rand::distributions::uniform::SampleUniform;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::AddAssign;

use crate::cs::graph::union_find::UnionFind;
use crate::error::{GraphError, Result};

/// Numeric edge weight accepted by both engines.
///
/// Implemented for every primitive integer and float type. Both engines
/// require the total weight of all edges to fit in `W`: every phase key,
/// merged entry and cut value is bounded by that total, so a graph whose total
/// overflows (or, for floats, reaches infinity) is rejected with
/// [`GraphError::InvalidInput`] before any contraction starts.
pub trait Weight:
    Copy
    + PartialOrd
    + Zero
    + AddAssign
    + for<'a> AddAssign<&'a Self>
    + Default
    + Debug
    + Send
    + Sync
    + SampleUniform
{
    /// `self + other`, or `None` when the sum is not representable.
    fn checked_sum(self, other: Self) -> Option<Self>;

    /// `false` for infinite and NaN floats; integers are always finite.
    fn is_finite_weight(self) -> bool;
}

macro_rules! int_weight {
    ($($t:ty)*) => {$(
        impl Weight for $t {
            fn checked_sum(self, other: Self) -> Option<Self> {
                CheckedAdd::checked_add(&self, &other)
            }

            fn is_finite_weight(self) -> bool {
                true
            }
        }
    )*};
}

macro_rules! float_weight {
    ($($t:ty)*) => {$(
        impl Weight for $t {
            fn checked_sum(self, other: Self) -> Option<Self> {
                let sum = self + other;
                Float::is_finite(sum).then_some(sum)
            }

            fn is_finite_weight(self) -> bool {
                Float::is_finite(self)
            }
        }
    )*};
}

int_weight!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);
float_weight!(f32 f64);

/// Represents an undirected, weighted edge in a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<W> {
    pub src: usize,
    pub dst: usize,
    pub weight: W,
}

impl<W> Edge<W> {
    pub fn new(src: usize, dst: usize, weight: W) -> Self {
        Self { src, dst, weight }
    }
}

/// Rejects out-of-range endpoints, self-loops, negative (or NaN) weights and
/// infinite weights.
pub(crate) fn check_edge<W: Weight>(num_vertices: usize, edge: &Edge<W>) -> Result<()> {
    for vertex in [edge.src, edge.dst] {
        if vertex >= num_vertices {
            return Err(GraphError::VertexOutOfRange {
                vertex,
                num_vertices,
            });
        }
    }
    if edge.src == edge.dst {
        return Err(GraphError::SelfLoop(edge.src));
    }
    // Written this way round so NaN fails the check too.
    if !(edge.weight >= W::zero()) {
        return Err(GraphError::NegativeWeight {
            src: edge.src,
            dst: edge.dst,
        });
    }
    if !edge.weight.is_finite_weight() {
        return Err(GraphError::invalid_input(format!(
            "edge ({}, {}) has a non-finite weight",
            edge.src, edge.dst
        )));
    }
    Ok(())
}

/// Sum of all edge weights, failing when it does not fit in `W`.
pub(crate) fn total_weight<W: Weight>(edges: &[Edge<W>]) -> Result<W> {
    edges.iter().try_fold(W::zero(), |total, e| {
        total.checked_sum(e.weight).ok_or_else(|| {
            GraphError::invalid_input("total edge weight does not fit in the weight type")
        })
    })
}

/// Adds `weight` onto `entry`, failing instead of overflowing.
fn accumulate<W: Weight>(entry: &mut W, weight: W, src: usize, dst: usize) -> Result<()> {
    *entry = (*entry).checked_sum(weight).ok_or_else(|| {
        GraphError::invalid_input(format!(
            "summed weight of edge ({src}, {dst}) does not fit in the weight type"
        ))
    })?;
    Ok(())
}

/// Counts the connected components induced by the edges of positive weight.
pub fn count_components<W: Weight>(num_vertices: usize, edges: &[Edge<W>]) -> usize {
    let mut uf = UnionFind::new(num_vertices);
    for e in edges {
        if e.weight > W::zero() && e.src < num_vertices && e.dst < num_vertices {
            uf.union(e.src, e.dst);
        }
    }
    uf.components()
}

/// Fails with [`GraphError::Disconnected`] unless the edges connect every vertex.
pub(crate) fn ensure_connected<W: Weight>(num_vertices: usize, edges: &[Edge<W>]) -> Result<()> {
    let components = count_components(num_vertices, edges);
    if components > 1 {
        return Err(GraphError::Disconnected { components });
    }
    Ok(())
}

/// Dense symmetric weight matrix. Entry `(i, j)` is the total weight between
/// `i` and `j`, zero when they are not adjacent; the diagonal is always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix<W> {
    pub(crate) weights: Array2<W>,
}

impl<W: Weight> AdjacencyMatrix<W> {
    /// Creates a graph on `n` vertices with no edges.
    pub fn new(n: usize) -> Self {
        Self {
            weights: Array2::from_elem((n, n), W::zero()),
        }
    }

    /// Builds a matrix from row vectors, validating shape, symmetry, the zero
    /// diagonal and non-negative weights.
    pub fn from_rows(rows: &[Vec<W>]) -> Result<Self> {
        let n = rows.len();
        let mut weights = Array2::from_elem((n, n), W::zero());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            for (j, &w) in row.iter().enumerate() {
                if i == j {
                    if w != W::zero() {
                        return Err(GraphError::SelfLoop(i));
                    }
                    continue;
                }
                check_edge(n, &Edge::new(i, j, w))?;
                weights[[i, j]] = w;
            }
        }
        let graph = Self { weights };
        graph.check_symmetric()?;
        Ok(graph)
    }

    /// Builds a matrix from an edge list. Parallel edges are summed.
    pub fn from_edges(n: usize, edges: &[Edge<W>]) -> Result<Self> {
        let mut graph = Self::new(n);
        for e in edges {
            graph.add_edge(e.src, e.dst, e.weight)?;
        }
        Ok(graph)
    }

    /// Builds a matrix from adjacency lists where `list[u]` holds `(v, weight)`
    /// pairs. Every undirected edge must be listed under both endpoints with the
    /// same total weight.
    pub fn from_adjacency_list(list: &[Vec<(usize, W)>]) -> Result<Self> {
        let n = list.len();
        let mut weights = Array2::from_elem((n, n), W::zero());
        for (u, neighbors) in list.iter().enumerate() {
            for &(v, w) in neighbors {
                check_edge(n, &Edge::new(u, v, w))?;
                accumulate(&mut weights[[u, v]], w, u, v)?;
            }
        }
        let graph = Self { weights };
        graph.check_symmetric()?;
        Ok(graph)
    }

    /// Adds `weight` between `src` and `dst`, accumulating onto any existing edge.
    pub fn add_edge(&mut self, src: usize, dst: usize, weight: W) -> Result<()> {
        check_edge(self.num_vertices(), &Edge::new(src, dst, weight))?;
        accumulate(&mut self.weights[[src, dst]], weight, src, dst)?;
        self.weights[[dst, src]] = self.weights[[src, dst]];
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight between `u` and `v`; zero when not adjacent.
    pub fn weight(&self, u: usize, v: usize) -> W {
        self.weights[[u, v]]
    }

    /// Induced edge list: one entry per adjacent pair with `src < dst`.
    pub fn edges(&self) -> Vec<Edge<W>> {
        let n = self.num_vertices();
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                let w = self.weights[[u, v]];
                if w > W::zero() {
                    edges.push(Edge::new(u, v, w));
                }
            }
        }
        edges
    }

    pub fn is_connected(&self) -> bool {
        count_components(self.num_vertices(), &self.edges()) <= 1
    }

    /// Total weight of edges with exactly one endpoint in `shore`.
    pub fn cut_weight(&self, shore: &[usize]) -> Result<W> {
        let n = self.num_vertices();
        let mut inside = bitvec![0; n];
        for &v in shore {
            if v >= n {
                return Err(GraphError::VertexOutOfRange {
                    vertex: v,
                    num_vertices: n,
                });
            }
            inside.set(v, true);
        }
        let mut total = W::zero();
        for u in inside.iter_ones() {
            for v in inside.iter_zeros() {
                total += self.weights[[u, v]];
            }
        }
        Ok(total)
    }

    fn check_symmetric(&self) -> Result<()> {
        let n = self.num_vertices();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.weights[[i, j]] != self.weights[[j, i]] {
                    return Err(GraphError::Asymmetric { row: i, col: j });
                }
            }
        }
        Ok(())
    }
}

/// Sparse adjacency: for each vertex, its neighbors and the summed weight to each.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyList<W> {
    pub(crate) adj: Vec<BTreeMap<usize, W>>,
}

impl<W: Weight> AdjacencyList<W> {
    /// Builds the sparse form from an edge list. Parallel edges are summed and
    /// zero-weight edges are dropped.
    pub fn from_edges(n: usize, edges: &[Edge<W>]) -> Result<Self> {
        let mut adj = vec![BTreeMap::new(); n];
        for e in edges {
            check_edge(n, e)?;
            if e.weight > W::zero() {
                let entry = adj[e.src].entry(e.dst).or_insert_with(W::zero);
                accumulate(entry, e.weight, e.src, e.dst)?;
                let summed = *entry;
                adj[e.dst].insert(e.src, summed);
            }
        }
        Ok(Self { adj })
    }

    pub fn from_matrix(matrix: &AdjacencyMatrix<W>) -> Self {
        let mut adj = vec![BTreeMap::new(); matrix.num_vertices()];
        for e in matrix.edges() {
            adj[e.src].insert(e.dst, e.weight);
            adj[e.dst].insert(e.src, e.weight);
        }
        Self { adj }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn neighbors(&self, u: usize) -> impl Iterator<Item = (usize, W)> + '_ {
        self.adj[u].iter().map(|(&v, &w)| (v, w))
    }

    /// Induced edge list with `src < dst`.
    pub fn edges(&self) -> Vec<Edge<W>> {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| {
                nbrs.range((u + 1)..)
                    .map(move |(&v, &w)| Edge::new(u, v, w))
            })
            .collect()
    }

    pub fn is_connected(&self) -> bool {
        count_components(self.num_vertices(), &self.edges()) <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn textbook() -> Vec<Edge<u32>> {
        vec![
            Edge::new(0, 1, 100),
            Edge::new(0, 3, 1),
            Edge::new(1, 2, 2),
            Edge::new(2, 3, 2),
        ]
    }

    #[test]
    fn test_edges_from_matrix() {
        let m = AdjacencyMatrix::from_edges(4, &textbook()).unwrap();
        let edges = m.edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.src < e.dst && e.weight > 0));
        assert!(edges.contains(&Edge::new(0, 1, 100)));
        assert!(edges.contains(&Edge::new(2, 3, 2)));
    }

    #[test]
    fn test_parallel_edges_are_summed() {
        let edges = vec![Edge::new(0, 1, 2), Edge::new(1, 0, 3), Edge::new(1, 2, 1)];
        let m = AdjacencyMatrix::from_edges(3, &edges).unwrap();
        assert_eq!(m.weight(0, 1), 5);
        assert_eq!(m.weight(1, 0), 5);
        assert_eq!(m.edges().len(), 2, "no duplicate unordered pairs");

        let list = AdjacencyList::from_edges(3, &edges).unwrap();
        assert_eq!(list.edges(), m.edges());
    }

    #[test]
    fn test_rejects_self_loop() {
        let err = AdjacencyMatrix::from_edges(3, &[Edge::new(1, 1, 4)]).unwrap_err();
        assert_eq!(err, GraphError::SelfLoop(1));

        let err = AdjacencyMatrix::from_rows(&[vec![1, 0], vec![0, 0]]).unwrap_err();
        assert_eq!(err, GraphError::SelfLoop(0));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = AdjacencyMatrix::from_edges(2, &[Edge::new(0, 5, 1)]).unwrap_err();
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 5,
                num_vertices: 2
            }
        );
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let err = AdjacencyMatrix::from_edges(2, &[Edge::new(0, 1, -1)]).unwrap_err();
        assert_eq!(err, GraphError::NegativeWeight { src: 0, dst: 1 });

        let err = AdjacencyList::from_edges(2, &[Edge::new(0, 1, f64::NAN)]).unwrap_err();
        assert_eq!(err, GraphError::NegativeWeight { src: 0, dst: 1 });
    }

    #[test]
    fn test_rejects_infinite_weight() {
        let edges = [Edge::new(0, 1, f64::INFINITY), Edge::new(1, 2, 1.0)];
        assert!(matches!(
            AdjacencyMatrix::from_edges(3, &edges).unwrap_err(),
            GraphError::InvalidInput(_)
        ));
        assert!(matches!(
            AdjacencyList::from_edges(3, &edges).unwrap_err(),
            GraphError::InvalidInput(_)
        ));
        assert!(matches!(
            AdjacencyMatrix::from_rows(&[vec![0.0, f32::INFINITY], vec![f32::INFINITY, 0.0]])
                .unwrap_err(),
            GraphError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_summed_parallel_edges_must_fit() {
        let edges = [Edge::new(0, 1, 200u8), Edge::new(1, 0, 100)];
        assert!(matches!(
            AdjacencyMatrix::from_edges(2, &edges).unwrap_err(),
            GraphError::InvalidInput(_)
        ));
        assert!(matches!(
            AdjacencyList::from_edges(2, &edges).unwrap_err(),
            GraphError::InvalidInput(_)
        ));

        let edges = [Edge::new(0, 1, 1e308), Edge::new(0, 1, 1e308)];
        assert!(AdjacencyMatrix::from_edges(2, &edges).is_err());
    }

    #[test]
    fn test_total_weight() {
        let edges = [Edge::new(0, 1, 200u8), Edge::new(1, 2, 55)];
        assert_eq!(total_weight(&edges).unwrap(), 255);

        let edges = [Edge::new(0, 1, 200u8), Edge::new(1, 2, 100)];
        assert!(matches!(
            total_weight(&edges).unwrap_err(),
            GraphError::InvalidInput(_)
        ));

        let edges = [Edge::new(0, 1, 1e308), Edge::new(1, 2, 1e308)];
        assert!(total_weight(&edges).is_err());
        assert_eq!(total_weight::<i64>(&[]).unwrap(), 0);
    }

    #[test]
    fn test_from_rows_shape_and_symmetry() {
        let err = AdjacencyMatrix::from_rows(&[vec![0, 1], vec![1]]).unwrap_err();
        assert_eq!(err, GraphError::NotSquare { rows: 2, cols: 1 });

        let err = AdjacencyMatrix::from_rows(&[vec![0, 1], vec![2, 0]]).unwrap_err();
        assert_eq!(err, GraphError::Asymmetric { row: 0, col: 1 });

        let m = AdjacencyMatrix::from_rows(&[vec![0, 3], vec![3, 0]]).unwrap();
        assert_eq!(m.num_vertices(), 2);
        assert_eq!(m.edges(), vec![Edge::new(0, 1, 3)]);
    }

    #[test]
    fn test_from_adjacency_list() {
        let list = vec![
            vec![(1, 1.5), (2, 0.5)],
            vec![(0, 1.5)],
            vec![(0, 0.5)],
        ];
        let m = AdjacencyMatrix::from_adjacency_list(&list).unwrap();
        assert_relative_eq!(m.weight(1, 0), 1.5);
        assert_relative_eq!(m.weight(2, 0), 0.5);
        assert_eq!(m.weight(1, 2), 0.0);

        let one_sided = vec![vec![(1, 1.0)], vec![]];
        assert_eq!(
            AdjacencyMatrix::from_adjacency_list(&one_sided).unwrap_err(),
            GraphError::Asymmetric { row: 0, col: 1 }
        );
    }

    #[test]
    fn test_connectivity() {
        let m = AdjacencyMatrix::from_edges(4, &textbook()).unwrap();
        assert!(m.is_connected());

        let split = AdjacencyMatrix::from_edges(4, &[Edge::new(0, 1, 1), Edge::new(2, 3, 1)])
            .unwrap();
        assert!(!split.is_connected());
        assert_eq!(count_components(4, &split.edges()), 2);
        assert_eq!(
            ensure_connected(4, &split.edges()).unwrap_err(),
            GraphError::Disconnected { components: 2 }
        );

        // Zero-weight edges do not connect anything.
        assert_eq!(count_components(2, &[Edge::new(0, 1, 0)]), 2);
        assert!(AdjacencyMatrix::<u8>::new(1).is_connected());
    }

    #[test]
    fn test_cut_weight() {
        let m = AdjacencyMatrix::from_edges(4, &textbook()).unwrap();
        assert_eq!(m.cut_weight(&[1, 2]).unwrap(), 102);
        assert_eq!(m.cut_weight(&[0, 3]).unwrap(), 102);
        assert_eq!(m.cut_weight(&[2]).unwrap(), 4);
        assert_eq!(m.cut_weight(&[2, 3]).unwrap(), 3);
        assert_eq!(m.cut_weight(&[]).unwrap(), 0);
        assert!(m.cut_weight(&[9]).is_err());
    }

    #[test]
    fn test_sparse_from_matrix() {
        let m = AdjacencyMatrix::from_edges(4, &textbook()).unwrap();
        let list = AdjacencyList::from_matrix(&m);
        assert_eq!(list.num_vertices(), 4);
        assert_eq!(list.neighbors(0).collect::<Vec<_>>(), vec![(1, 100), (3, 1)]);
        assert_eq!(list.edges(), m.edges());
        assert!(list.is_connected());
    }
}
