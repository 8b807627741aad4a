//! # Stoer-Wagner minimum cut
//!
//! Deterministic global minimum cut by repeated maximum-adjacency search.
//!
//! Each phase grows a set `A` from the lowest live vertex, always adding the
//! vertex most tightly connected to `A` (ties go to the lowest vertex id).
//! The weight that connected the last vertex `t` when it joined is the
//! cut-of-the-phase: the cut separating `t` from everything else in the current
//! graph. Then `t` is merged into the vertex `s` added just before it. A
//! minimum cut either separates `s` and `t`, in which case this phase found
//! it, or it does not, in which case it survives the merge. After `V - 1`
//! phases the smallest cut-of-the-phase is the global minimum.
//!
//! Two drivers share those semantics:
//!
//! * [`stoer_wagner`] scans a dense [`AdjacencyMatrix`], `O(V^3)` overall.
//!   Merged vertices are dropped from a list of live indices instead of
//!   splicing rows and columns out of the matrix.
//! * [`stoer_wagner_sparse`] keeps a [`BinaryHeap`] of candidates over an
//!   [`AdjacencyList`], `O(V E log V)` overall.
//!
//! Phases depend on the previous merge and always run one after another.

use bitvec::prelude::*;
use log::{debug, trace};
use ndarray::Array2;
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use crate::cs::graph::adjacency::{
    ensure_connected, total_weight, AdjacencyList, AdjacencyMatrix, Weight,
};
use crate::cs::graph::MinCut;
use crate::error::{GraphError, Result};

/// Outcome of one maximum-adjacency search.
struct Phase<W> {
    prev: usize,
    last: usize,
    cut: W,
}

/// Computes the exact global minimum cut of a dense graph.
///
/// # Arguments
/// * `graph` - Symmetric weight matrix. It is contracted in place: on return
///   it holds merged weights and no longer describes the input graph. Clone it
///   first if it is needed afterwards.
///
/// # Returns
/// * `Ok(MinCut)` - The cut value and the vertices on the side of the last
///   vertex of the winning phase
///
/// # Complexity
/// * Time: O(V^3)
/// * Space: O(V)
///
/// # Errors
/// * `Disconnected` if the graph has more than one component
/// * `InvalidInput` if the total edge weight does not fit in `W`
pub fn stoer_wagner<W: Weight>(graph: &mut AdjacencyMatrix<W>) -> Result<MinCut<W>> {
    let n = graph.num_vertices();
    if n < 2 {
        return Ok(MinCut::trivial());
    }
    let edges = graph.edges();
    total_weight(&edges)?;
    ensure_connected(n, &edges)?;
    debug!("stoer-wagner: {} vertices (dense)", n);

    let mut active: Vec<usize> = (0..n).collect();
    let mut members: Vec<Vec<usize>> = (0..n).map(|v| vec![v]).collect();
    let mut best: Option<MinCut<W>> = None;

    while active.len() > 1 {
        let Some(phase) = dense_phase(&graph.weights, &active) else {
            break;
        };
        record_phase(&mut best, &phase, &members);

        merge_dense(&mut graph.weights, &active, phase.prev, phase.last);
        let absorbed = std::mem::take(&mut members[phase.last]);
        members[phase.prev].extend(absorbed);
        // Order-preserving removal keeps "lowest live vertex first".
        active.retain(|&v| v != phase.last);
    }

    finish(best)
}

/// Exact minimum cut value of a dense graph. See [`stoer_wagner`]; the matrix
/// is consumed as scratch space.
///
/// # Examples
/// ```
/// use mincut::graph::{exact_min_cut, AdjacencyMatrix, Edge};
///
/// let edges = [Edge::new(0, 1, 3u32), Edge::new(1, 2, 1), Edge::new(0, 2, 1)];
/// let graph = AdjacencyMatrix::from_edges(3, &edges).unwrap();
///
/// assert_eq!(exact_min_cut(&mut graph.clone()).unwrap(), 2);
/// ```
pub fn exact_min_cut<W: Weight>(graph: &mut AdjacencyMatrix<W>) -> Result<W> {
    stoer_wagner(graph).map(|cut| cut.value)
}

fn dense_phase<W: Weight>(weights: &Array2<W>, active: &[usize]) -> Option<Phase<W>> {
    let k = active.len();
    let start = *active.first()?;

    // Positions into `active`, not vertex ids.
    let mut added = bitvec![0; k];
    let mut key = vec![W::zero(); k];
    added.set(0, true);
    for i in 1..k {
        key[i] = weights[[start, active[i]]];
    }

    let mut prev = start;
    let mut last = start;
    let mut cut = W::zero();
    for _ in 1..k {
        let mut tightest: Option<usize> = None;
        for i in added.iter_zeros() {
            if tightest.map_or(true, |t| key[i] > key[t]) {
                tightest = Some(i);
            }
        }
        let next = tightest?;

        added.set(next, true);
        prev = last;
        last = active[next];
        cut = key[next];

        for i in added.iter_zeros() {
            key[i] += weights[[last, active[i]]];
        }
    }

    Some(Phase { prev, last, cut })
}

fn merge_dense<W: Weight>(weights: &mut Array2<W>, active: &[usize], keep: usize, gone: usize) {
    for &i in active {
        if i == keep || i == gone {
            continue;
        }
        let w = weights[[gone, i]];
        weights[[keep, i]] += w;
        weights[[i, keep]] = weights[[keep, i]];
    }
}

/// Heap entry; the greatest key wins, then the lowest vertex id.
#[derive(Debug, Clone, Copy)]
struct Candidate<W> {
    key: W,
    vertex: usize,
}

impl<W: PartialOrd> PartialEq for Candidate<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: PartialOrd> Eq for Candidate<W> {}

impl<W: PartialOrd> PartialOrd for Candidate<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: PartialOrd> Ord for Candidate<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .partial_cmp(&other.key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Computes the exact global minimum cut of a sparse graph with a
/// priority-queue driven maximum-adjacency search.
///
/// Phase order, tie-breaking and merge targets match [`stoer_wagner`], so both
/// report the same value. `graph` is contracted in place.
///
/// # Errors
/// * `Disconnected` if the graph has more than one component
/// * `InvalidInput` if the total edge weight does not fit in `W`
pub fn stoer_wagner_sparse<W: Weight>(graph: &mut AdjacencyList<W>) -> Result<MinCut<W>> {
    let n = graph.num_vertices();
    if n < 2 {
        return Ok(MinCut::trivial());
    }
    let edges = graph.edges();
    total_weight(&edges)?;
    ensure_connected(n, &edges)?;
    debug!("stoer-wagner: {} vertices (sparse)", n);

    let mut alive: BTreeSet<usize> = (0..n).collect();
    let mut members: Vec<Vec<usize>> = (0..n).map(|v| vec![v]).collect();
    let mut best: Option<MinCut<W>> = None;

    while alive.len() > 1 {
        let Some(phase) = sparse_phase(graph, &alive) else {
            break;
        };
        record_phase(&mut best, &phase, &members);

        merge_sparse(graph, phase.prev, phase.last);
        let absorbed = std::mem::take(&mut members[phase.last]);
        members[phase.prev].extend(absorbed);
        alive.remove(&phase.last);
    }

    finish(best)
}

fn sparse_phase<W: Weight>(graph: &AdjacencyList<W>, alive: &BTreeSet<usize>) -> Option<Phase<W>> {
    let n = graph.num_vertices();
    let mut added = bitvec![0; n];
    let mut key = vec![W::zero(); n];
    // Every live vertex starts at key zero, so the first pop is the lowest id.
    let mut heap: BinaryHeap<Candidate<W>> = alive
        .iter()
        .map(|&vertex| Candidate {
            key: W::zero(),
            vertex,
        })
        .collect();

    let mut order: Vec<usize> = Vec::with_capacity(alive.len());
    let mut cut = W::zero();
    while let Some(Candidate { key: k, vertex: v }) = heap.pop() {
        if added[v] || k < key[v] {
            // Stale entry.
            continue;
        }
        added.set(v, true);
        order.push(v);
        cut = key[v];

        for (u, w) in graph.neighbors(v) {
            if !added[u] {
                key[u] += w;
                heap.push(Candidate {
                    key: key[u],
                    vertex: u,
                });
            }
        }
    }

    match order.as_slice() {
        [.., prev, last] => Some(Phase {
            prev: *prev,
            last: *last,
            cut,
        }),
        _ => None,
    }
}

fn merge_sparse<W: Weight>(graph: &mut AdjacencyList<W>, keep: usize, gone: usize) {
    let neighbors = std::mem::take(&mut graph.adj[gone]);
    for (v, w) in neighbors {
        graph.adj[v].remove(&gone);
        if v == keep {
            continue;
        }
        *graph.adj[keep].entry(v).or_insert_with(W::zero) += w;
        *graph.adj[v].entry(keep).or_insert_with(W::zero) += w;
    }
}

fn record_phase<W: Weight>(best: &mut Option<MinCut<W>>, phase: &Phase<W>, members: &[Vec<usize>]) {
    trace!(
        "stoer-wagner phase: cut-of-the-phase {:?}, merging {} into {}",
        phase.cut,
        phase.last,
        phase.prev
    );
    if best.as_ref().map_or(true, |b| phase.cut < b.value) {
        let mut partition = members[phase.last].clone();
        partition.sort_unstable();
        *best = Some(MinCut {
            value: phase.cut,
            partition,
        });
    }
}

fn finish<W: Weight>(best: Option<MinCut<W>>) -> Result<MinCut<W>> {
    let cut = best.ok_or_else(|| GraphError::invalid_input("no phase completed"))?;
    debug!("stoer-wagner: minimum cut {:?}", cut.value);
    Ok(cut)
}
