//! Error types shared by the graph algorithms.

use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while validating a graph or running a cut algorithm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Generic malformed input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A vertex index is not in `0..num_vertices`
    #[error("vertex {vertex} out of range for a graph with {num_vertices} vertices")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    /// An edge connects a vertex to itself
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    /// An edge weight is negative or not a number
    #[error("edge ({src}, {dst}) has a negative or undefined weight")]
    NegativeWeight { src: usize, dst: usize },

    /// Adjacency matrix rows and columns differ in length
    #[error("adjacency matrix is not square ({rows} rows, {cols} columns)")]
    NotSquare { rows: usize, cols: usize },

    /// Adjacency matrix entry differs from its mirror
    #[error("adjacency matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },

    /// The graph has more than one connected component
    #[error("graph is disconnected ({components} components)")]
    Disconnected { components: usize },

    /// The randomized engine was asked to run no trials
    #[error("trial count must be at least 1, got {0}")]
    InvalidTrialCount(usize),
}

impl GraphError {
    /// Builds an [`GraphError::InvalidInput`] from any message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GraphError::InvalidInput(msg.into())
    }
}
