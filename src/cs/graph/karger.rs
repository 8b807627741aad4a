//! # Karger's contraction algorithm
//!
//! Monte Carlo global minimum cut. One trial contracts randomly drawn edges
//! until two super-vertices remain and reports the weight of the edges
//! running between them. Repeating the trial `k` times and keeping the
//! smallest value finds a true minimum cut with probability at least
//! `1 - (1 - 2/(n(n-1)))^k`.
//!
//! Contraction is simulated with a [`UnionFind`] over the vertices. The edge
//! list itself is never shrunk: a drawn edge whose endpoints already share a
//! root is a self-loop of the contracted graph and is simply discarded.
//!
//! Weighted edges are drawn with probability proportional to their weight,
//! which is the same as treating an integer weight `w` as `w` parallel unit
//! edges.
//!
//! Trials share no mutable state. With [`KargerConfig::parallel`] they are
//! spread over the rayon pool and reduced by minimum; each trial seeds its own
//! ChaCha stream from the configured seed, so a seeded run returns the same
//! cut whether it ran sequentially or in parallel.

use log::{debug, trace};
use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::cmp::Ordering;

use crate::cs::graph::adjacency::{
    check_edge, ensure_connected, total_weight, AdjacencyMatrix, Edge, Weight,
};
use crate::cs::graph::union_find::UnionFind;
use crate::cs::graph::MinCut;
use crate::error::{GraphError, Result};

/// Trial count used when none is given.
pub const DEFAULT_TRIALS: usize = 100;

/// How a single trial picks the next edge to contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractionStrategy {
    /// Draw from the full edge list on every step, discarding contracted self-loops.
    #[default]
    Sampling,
    /// Shuffle the edge list once and contract in that order. Requires all
    /// edges to carry the same weight.
    Permutation,
}

/// Configuration for the randomized engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KargerConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Base seed; `None` draws a fresh one from the thread RNG
    pub seed: Option<u64>,
    /// Run trials on the rayon pool
    pub parallel: bool,
    /// Edge selection used within a trial
    pub strategy: ContractionStrategy,
}

impl Default for KargerConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            parallel: false,
            strategy: ContractionStrategy::Sampling,
        }
    }
}

impl KargerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the `n^2 ln n` trial count that makes a wrong answer unlikely on
    /// a graph with `num_vertices` vertices.
    pub fn for_vertices(num_vertices: usize) -> Self {
        Self {
            trials: recommended_trials(num_vertices),
            ..Self::default()
        }
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_strategy(mut self, strategy: ContractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// `floor(n^2 ln n)`, at least 1.
pub fn recommended_trials(num_vertices: usize) -> usize {
    if num_vertices < 2 {
        return 1;
    }
    let n = num_vertices as f64;
    ((n * n * n.ln()) as usize).max(1)
}

/// Draws edge indices: uniformly when every edge has the same weight,
/// proportionally to weight otherwise.
enum EdgeSampler<W: Weight> {
    Uniform(Uniform<usize>),
    Weighted(WeightedIndex<W>),
}

impl<W: Weight> EdgeSampler<W> {
    fn new(edges: &[Edge<W>]) -> Result<Self> {
        let first = edges
            .first()
            .ok_or_else(|| GraphError::invalid_input("no edges to sample from"))?
            .weight;
        if edges.iter().all(|e| e.weight == first) {
            return Ok(EdgeSampler::Uniform(Uniform::from(0..edges.len())));
        }
        WeightedIndex::new(edges.iter().map(|e| e.weight))
            .map(EdgeSampler::Weighted)
            .map_err(|err| GraphError::invalid_input(format!("edge weights: {err}")))
    }

    fn is_uniform(&self) -> bool {
        matches!(self, EdgeSampler::Uniform(_))
    }
}

impl<W: Weight> Distribution<usize> for EdgeSampler<W> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            EdgeSampler::Uniform(dist) => dist.sample(rng),
            EdgeSampler::Weighted(dist) => dist.sample(rng),
        }
    }
}

/// Validates every edge and drops the zero-weight ones. The total weight must
/// fit in `W`, which bounds both the sampler's running sum and every cut value.
fn prepare_edges<W: Weight>(num_vertices: usize, edges: &[Edge<W>]) -> Result<Vec<Edge<W>>> {
    for e in edges {
        check_edge(num_vertices, e)?;
    }
    total_weight(edges)?;
    Ok(edges
        .iter()
        .filter(|e| e.weight > W::zero())
        .copied()
        .collect())
}

fn trial_rng(seed: u64, trial: usize) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}

/// One contraction trial over a connected graph with at least two vertices.
fn contract<W: Weight, R: Rng + ?Sized>(
    num_vertices: usize,
    edges: &[Edge<W>],
    sampler: &EdgeSampler<W>,
    strategy: ContractionStrategy,
    rng: &mut R,
) -> MinCut<W> {
    let mut uf = UnionFind::new(num_vertices);
    match strategy {
        ContractionStrategy::Sampling => {
            while uf.components() > 2 {
                let edge = &edges[sampler.sample(rng)];
                let root_u = uf.find(edge.src);
                let root_v = uf.find(edge.dst);
                if root_u == root_v {
                    // Self-loop in the contracted graph.
                    continue;
                }
                uf.union(root_u, root_v);
            }
        }
        ContractionStrategy::Permutation => {
            let mut order: Vec<usize> = (0..edges.len()).collect();
            order.shuffle(rng);
            for idx in order {
                if uf.components() <= 2 {
                    break;
                }
                uf.union(edges[idx].src, edges[idx].dst);
            }
        }
    }
    crossing_cut(&mut uf, edges)
}

/// Weight of the edges whose endpoints ended up in different components,
/// plus the vertices not sharing a component with vertex 0.
fn crossing_cut<W: Weight>(uf: &mut UnionFind, edges: &[Edge<W>]) -> MinCut<W> {
    let mut value = W::zero();
    for e in edges {
        if uf.find(e.src) != uf.find(e.dst) {
            value += e.weight;
        }
    }
    let anchor = uf.find(0);
    let partition = (0..uf.len()).filter(|&v| uf.find(v) != anchor).collect();
    MinCut { value, partition }
}

fn by_value_then_trial<W: Weight>(a: &(usize, MinCut<W>), b: &(usize, MinCut<W>)) -> Ordering {
    a.1.value
        .partial_cmp(&b.1.value)
        .unwrap_or(Ordering::Equal)
        .then(a.0.cmp(&b.0))
}

/// Runs a single contraction trial.
///
/// Uses the same validation as [`randomized_min_cut_edges`]; graphs with
/// fewer than two vertices give a zero cut.
pub fn contract_once<W, R>(num_vertices: usize, edges: &[Edge<W>], rng: &mut R) -> Result<MinCut<W>>
where
    W: Weight,
    R: Rng + ?Sized,
{
    let edges = prepare_edges(num_vertices, edges)?;
    if num_vertices < 2 {
        return Ok(MinCut::trivial());
    }
    ensure_connected(num_vertices, &edges)?;
    let sampler = EdgeSampler::new(&edges)?;
    Ok(contract(
        num_vertices,
        &edges,
        &sampler,
        ContractionStrategy::Sampling,
        rng,
    ))
}

/// Best cut over `config.trials` independent contraction trials.
///
/// # Arguments
/// - `num_vertices`: Number of vertices, labelled `0..num_vertices`.
/// - `edges`: Undirected weighted edges. Repeated pairs are parallel edges.
/// - `config`: Trial count, seed, parallelism and contraction strategy.
///
/// # Returns
/// The smallest cut seen together with the shore that excludes vertex 0.
/// The value is never below the true minimum cut.
///
/// # Errors
/// * `InvalidTrialCount` if `config.trials` is zero
/// * `VertexOutOfRange`, `SelfLoop`, `NegativeWeight` for malformed edges
/// * `Disconnected` if the edges do not span every vertex
/// * `InvalidInput` for [`ContractionStrategy::Permutation`] on non-uniform weights,
///   for infinite weights, or when the total edge weight does not fit in `W`
pub fn randomized_min_cut_edges<W>(
    num_vertices: usize,
    edges: &[Edge<W>],
    config: &KargerConfig,
) -> Result<MinCut<W>>
where
    W: Weight,
    <W as SampleUniform>::Sampler: Sync,
{
    if config.trials == 0 {
        return Err(GraphError::InvalidTrialCount(config.trials));
    }
    let edges = prepare_edges(num_vertices, edges)?;
    if num_vertices < 2 {
        return Ok(MinCut::trivial());
    }
    ensure_connected(num_vertices, &edges)?;

    let sampler = EdgeSampler::new(&edges)?;
    if config.strategy == ContractionStrategy::Permutation && !sampler.is_uniform() {
        return Err(GraphError::invalid_input(
            "permutation contraction requires uniform edge weights",
        ));
    }

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!(
        "karger: {} vertices, {} edges, {} trials, seed {}, parallel {}",
        num_vertices,
        edges.len(),
        config.trials,
        seed,
        config.parallel
    );

    let run = |trial: usize| {
        let mut rng = trial_rng(seed, trial);
        let cut = contract(num_vertices, &edges, &sampler, config.strategy, &mut rng);
        trace!("karger trial {}: cut {:?}", trial, cut.value);
        (trial, cut)
    };

    let best = if config.parallel {
        (0..config.trials)
            .into_par_iter()
            .map(&run)
            .min_by(by_value_then_trial)
    } else {
        (0..config.trials).map(&run).min_by(by_value_then_trial)
    };

    let (trial, cut) = best.ok_or(GraphError::InvalidTrialCount(config.trials))?;
    debug!("karger: best cut {:?} from trial {}", cut.value, trial);
    Ok(cut)
}

/// Randomized min cut of a dense graph. The matrix is only read.
pub fn randomized_min_cut<W>(graph: &AdjacencyMatrix<W>, config: &KargerConfig) -> Result<W>
where
    W: Weight,
    <W as SampleUniform>::Sampler: Sync,
{
    randomized_min_cut_edges(graph.num_vertices(), &graph.edges(), config).map(|cut| cut.value)
}

/// Implements Karger's randomized min cut algorithm on an unweighted multigraph.
///
/// # Arguments
/// - `num_vertices`: Number of vertices in the graph.
/// - `edges`: Slice of edges as (u, v) pairs (0-indexed). The graph is undirected.
/// - `trials`: Number of independent trials to run (the more, the higher the chance to find the minimum cut).
///
/// # Returns
/// The estimated minimum cut value, as a number of edges.
///
/// # Examples
/// ```
/// use mincut::graph::karger_min_cut;
///
/// // Two triangles joined by one bridge edge.
/// let edges = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)];
/// assert!(karger_min_cut(6, &edges, 200).unwrap() >= 1);
/// ```
pub fn karger_min_cut(num_vertices: usize, edges: &[(usize, usize)], trials: usize) -> Result<usize> {
    let edges: Vec<Edge<usize>> = edges.iter().map(|&(u, v)| Edge::new(u, v, 1)).collect();
    let config = KargerConfig::default().with_trials(trials);
    randomized_min_cut_edges(num_vertices, &edges, &config).map(|cut| cut.value)
}
