/*!
# Graph Operations

Capability traits every graph representation provides. Algorithms only ever talk to graphs
through these traits, so any storage that can answer them can be plugged in.

Edges are addressed by their [`EdgeId`] which makes parallel edges and per-edge attributes
(weights, flows) unambiguous. For undirected graphs, *incoming*, *outgoing* and *incident*
edges coincide.
*/

use std::ops::Range;

use fxhash::FxHashSet;

use crate::{edge::*, node::*};

/// Marker for directed graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directed;

/// Marker for undirected graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Undirected;

/// Implemented by [`Directed`] and [`Undirected`]
pub trait GraphDir {
    const IS_DIRECTED: bool;
}

impl GraphDir for Directed {
    const IS_DIRECTED: bool = true;
}

impl GraphDir for Undirected {
    const IS_DIRECTED: bool = false;
}

/// Compile-time directedness of a graph type
pub trait GraphType {
    type Dir: GraphDir;

    /// Returns *true* if edges are oriented
    fn is_directed() -> bool {
        Self::Dir::IS_DIRECTED
    }

    /// Returns *true* if edges are not oriented
    fn is_undirected() -> bool {
        !Self::is_directed()
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns a range of all vertices that does not borrow `self`
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns *true* if `u` is a vertex of the graph
    fn has_vertex(&self, u: Node) -> bool {
        u < self.number_of_nodes()
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns a range over all edge ids
    fn edge_ids(&self) -> Range<EdgeId> {
        0..self.number_of_edges()
    }

    /// Returns *true* if `e` identifies an edge of the graph
    fn has_edge_id(&self, e: EdgeId) -> bool {
        e < self.number_of_edges()
    }

    /// Returns *true* if the graph has no edges
    fn is_edgeless(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Per-edge attributes: endpoints and weight
pub trait EdgeAttributes: GraphEdgeOrder {
    /// Returns the endpoints of edge `e`; for directed graphs this is `(source, target)`.
    /// ** Panics if `e >= m` **
    fn endpoints(&self, e: EdgeId) -> Edge;

    /// Returns the weight of edge `e`
    /// ** Panics if `e >= m` **
    fn weight_of(&self, e: EdgeId) -> Weight;

    /// ** Panics if `e >= m` **
    fn edge_source(&self, e: EdgeId) -> Node {
        self.endpoints(e).0
    }

    /// ** Panics if `e >= m` **
    fn edge_target(&self, e: EdgeId) -> Node {
        self.endpoints(e).1
    }

    /// Returns the endpoint of `e` that is not `u` (or `u` itself for a self-loop).
    /// ** Panics if `e >= m` **
    fn opposite(&self, e: EdgeId, u: Node) -> Node {
        let Edge(a, b) = self.endpoints(e);
        debug_assert!(a == u || b == u, "{u} is not incident to edge {e}");
        if a == u { b } else { a }
    }

    /// Returns an iterator over all edges with their weights in id-order
    fn weighted_edges(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.edge_ids().map(|e| {
            let Edge(u, v) = self.endpoints(e);
            WeightedEdge(u, v, self.weight_of(e))
        })
    }

    /// Returns the sum of all edge weights
    fn total_weight(&self) -> Weight {
        self.edge_ids().map(|e| self.weight_of(e)).sum()
    }
}

/// Traits pertaining getters for incident edges & neighborhoods
pub trait IncidenceList: GraphNodeOrder + EdgeAttributes + GraphType + Sized {
    /// Returns an iterator over the ids of all edges leaving `u`.
    /// ** Panics if `u >= n` **
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns an iterator over the ids of all edges entering `u`.
    /// ** Panics if `u >= n` **
    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns an iterator over the ids of all edges incident to `u` regardless of orientation.
    /// In directed graphs, a self-loop at `u` is reported twice.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_;

    /// ** Panics if `u >= n` **
    fn out_degree_of(&self, u: Node) -> NumEdges;

    /// ** Panics if `u >= n` **
    fn in_degree_of(&self, u: Node) -> NumEdges;

    /// Returns the number of incident edges
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumEdges;

    /// Returns an iterator over all `v` with an edge `(u, v)`; parallel edges yield `v` repeatedly.
    /// ** Panics if `u >= n` **
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.out_edges_of(u).map(move |e| self.opposite(e, u))
    }

    /// Returns an iterator over all `v` with an edge `(v, u)`; parallel edges yield `v` repeatedly.
    /// ** Panics if `u >= n` **
    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.in_edges_of(u).map(move |e| self.opposite(e, u))
    }

    /// Equivalent to `out_neighbors_of`
    /// ** Panics if `u >= n` **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.out_neighbors_of(u)
    }

    /// Returns the neighbors of `u` in the underlying undirected graph.
    /// ** Panics if `u >= n` **
    fn undirected_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.edges_of(u).map(move |e| self.opposite(e, u))
    }
}

/// Edge queries by endpoints.
///
/// Implemented for all [`IncidenceList`]s.
pub trait AdjacencyTest: IncidenceList {
    /// Returns the id of some edge `(u, v)` if one exists.
    /// ** Panics if `u >= n` **
    fn find_edge(&self, u: Node, v: Node) -> Option<EdgeId> {
        self.out_edges_of(u).find(|&e| self.opposite(e, u) == v)
    }

    /// Returns *true* if an edge `(u, v)` exists
    /// ** Panics if `u >= n` **
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.find_edge(u, v).is_some()
    }

    /// Returns *true* if some edge is a self-loop
    fn has_self_loops(&self) -> bool {
        self.edge_ids().any(|e| self.endpoints(e).is_loop())
    }

    /// Returns *true* if two edges share the same endpoints (and orientation if directed)
    fn has_parallel_edges(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.edge_ids().any(|e| {
            let edge = self.endpoints(e);
            let key = if Self::is_directed() {
                edge
            } else {
                edge.normalized()
            };
            !seen.insert(key)
        })
    }
}

impl<G: IncidenceList> AdjacencyTest for G {}

/// Trait for creating a new empty graph
pub trait GraphNew {
    /// Creates an empty graph with `n` singleton nodes
    fn new(n: NumNodes) -> Self;
}

/// Provides functions to insert edges and alter their weights
pub trait GraphEdgeEditing: GraphNew + EdgeAttributes {
    /// Adds the edge `(u, v)` with the given weight and returns its id.
    /// Parallel edges and self-loops are allowed.
    /// ** Panics if `u >= n || v >= n` **
    fn add_weighted_edge(&mut self, u: Node, v: Node, weight: Weight) -> EdgeId;

    /// Adds the edge `(u, v)` with [`DEFAULT_EDGE_WEIGHT`] and returns its id.
    /// ** Panics if `u >= n || v >= n` **
    fn add_edge(&mut self, u: Node, v: Node) -> EdgeId {
        self.add_weighted_edge(u, v, DEFAULT_EDGE_WEIGHT)
    }

    /// Adds all edges of an iterator with [`DEFAULT_EDGE_WEIGHT`]
    /// ** Panics if any endpoint is `>= n` **
    fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        for e in edges {
            let Edge(u, v) = e.into();
            self.add_edge(u, v);
        }
    }

    /// Adds all weighted edges of an iterator
    /// ** Panics if any endpoint is `>= n` **
    fn add_weighted_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator,
        I::Item: Into<WeightedEdge>,
    {
        for e in edges {
            let WeightedEdge(u, v, w) = e.into();
            self.add_weighted_edge(u, v, w);
        }
    }

    /// Overwrites the weight of edge `e`
    /// ** Panics if `e >= m` **
    fn set_edge_weight(&mut self, e: EdgeId, weight: Weight);
}

/// Provides constructors from edge lists
pub trait GraphFromScratch {
    /// Creates a graph with `n` nodes and the given edges (all of weight [`DEFAULT_EDGE_WEIGHT`]).
    /// Edge ids follow the iteration order.
    fn from_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Edge>;

    /// Creates a graph with `n` nodes and the given weighted edges.
    /// Edge ids follow the iteration order.
    fn from_weighted_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<WeightedEdge>;
}

impl<G: GraphEdgeEditing> GraphFromScratch for G {
    fn from_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }

    fn from_weighted_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<WeightedEdge>,
    {
        let mut graph = Self::new(n);
        graph.add_weighted_edges(edges);
        graph
    }
}
