use std::fmt::{Debug, Display};

use crate::node::Node;

/// An edge is defined by two nodes/endpoints.
/// It is up to the graph whether an Edge is directed or not.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Edges are identified by their insertion index `0..m`; ids never change.
pub type EdgeId = u32;

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = EdgeId;

/// Edge weights (capacities in flow networks) are floating point
pub type Weight = f64;

/// Weight assigned to edges that are added without an explicit weight
pub const DEFAULT_EDGE_WEIGHT: Weight = 1.0;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

/// An edge together with its weight
#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct WeightedEdge(pub Node, pub Node, pub Weight);

impl WeightedEdge {
    /// Drops the weight
    pub fn edge(&self) -> Edge {
        Edge(self.0, self.1)
    }

    pub fn weight(&self) -> Weight {
        self.2
    }
}

impl Display for WeightedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{};{})", self.0, self.1, self.2)
    }
}

impl Debug for WeightedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl From<(Node, Node, Weight)> for WeightedEdge {
    fn from(value: (Node, Node, Weight)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}

impl From<&(Node, Node, Weight)> for WeightedEdge {
    fn from(value: &(Node, Node, Weight)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}

impl From<Edge> for WeightedEdge {
    fn from(value: Edge) -> Self {
        WeightedEdge(value.0, value.1, DEFAULT_EDGE_WEIGHT)
    }
}

impl From<&WeightedEdge> for WeightedEdge {
    fn from(value: &WeightedEdge) -> Self {
        *value
    }
}
