pub mod adjacency;
pub mod karger;
pub mod stoer_wagner;
pub mod union_find;


use num_traits::Zero;

pub use adjacency::{count_components, AdjacencyList, AdjacencyMatrix, Edge, Weight};
pub use karger::{
    contract_once, karger_min_cut, randomized_min_cut, randomized_min_cut_edges,
    recommended_trials, ContractionStrategy, KargerConfig,
};
pub use stoer_wagner::{exact_min_cut, stoer_wagner, stoer_wagner_sparse};
pub use union_find::UnionFind;

/// A cut found by one of the min-cut engines.
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut<W> {
    /// Total weight of the edges crossing the cut
    pub value: W,
    /// Sorted vertices on one side of the cut; the rest form the other side
    pub partition: Vec<usize>,
}

impl<W: Zero> MinCut<W> {
    /// The zero cut reported for graphs with fewer than two vertices.
    pub fn trivial() -> Self {
        Self {
            value: W::zero(),
            partition: Vec::new(),
        }
    }
}
