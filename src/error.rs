/*!
# Errors

Every fallible algorithm reports one of the following error families.
Preconditions are checked before any algorithmic work is done; violated internal invariants
are bugs and surface as debug assertions instead.
*/

use thiserror::Error;

use crate::{algo::Color, edge::*, node::*};

/// Errors raised by maximum-flow, minimum-cut and flow-tree algorithms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("node {0} is not part of the graph")]
    NodeNotFound(Node),

    #[error("source and sink must be distinct, but both are {0}")]
    SourceEqualsSink(Node),

    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: EdgeId, weight: Weight },

    #[error("edge {0} is not part of the graph")]
    EdgeNotFound(EdgeId),

    #[error("{0} is only defined on undirected graphs")]
    RequiresUndirected(&'static str),

    /// The algorithm only computes aggregate values; this is a structural limitation
    #[error("{0} is not supported by this algorithm")]
    Unsupported(&'static str),

    #[error("discharge budget of {0} operations exhausted before convergence")]
    BudgetExhausted(u64),

    #[error("no flow has been computed yet")]
    NotComputed,
}

/// Errors raised when a [`Coloring`](crate::algo::Coloring) is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColoringError {
    #[error("coloring covers {actual} nodes but the graph has {expected}")]
    WrongDomain { expected: NumNodes, actual: usize },

    #[error("node {node} has color {color} outside of 1..={number_of_colors}")]
    ColorOutOfRange {
        node: Node,
        color: Color,
        number_of_colors: Color,
    },

    #[error("color {0} is not used by any node")]
    UnusedColor(Color),
}

/// Errors raised by the color-refinement isomorphism test
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsomorphismError {
    #[error("graphs with parallel edges are not supported")]
    ParallelEdges,

    #[error("cannot compare a directed with an undirected graph")]
    DirectednessMismatch,

    /// Color refinement is inconclusive for this pair; this is *not* a negative answer
    #[error("color refinement cannot decide whether the graphs are isomorphic")]
    Undecidable,
}
